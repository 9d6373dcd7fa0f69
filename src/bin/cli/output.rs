//! Output formatting for CLI operations.

use std::path::Path;

use serde_json::{Value, json};
use tiwut::{ArchiveTree, EditResult, EntryInfo, NodeId, StoreOptions};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats a newly created container
    fn format_created(&self, path: &Path, options: &StoreOptions) -> String;

    /// Formats the container tree
    fn format_tree(&self, tree: &ArchiveTree) -> String;

    /// Formats a list of entries
    fn format_list(&self, entries: &[EntryInfo], technical: bool) -> String;

    /// Formats the result of a write
    fn format_edit_result(&self, entry: &str, result: &EditResult) -> String;

    /// Formats an imported file
    fn format_imported(&self, source: &Path, entry: &str) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_created(&self, path: &Path, options: &StoreOptions) -> String {
        let mut output = format!("Created {}\n", path.display());
        for dir in options.skeleton.directories() {
            output.push_str(&format!("  {}\n", dir));
        }
        output.push_str(&format!("  {}\n", options.skeleton.metadata_entry_name()));
        output
    }

    fn format_tree(&self, tree: &ArchiveTree) -> String {
        let mut output = String::new();
        for (depth, node) in tree.walk() {
            output.push_str(&"  ".repeat(depth));
            output.push_str(&node.label());
            output.push('\n');
        }
        output
    }

    fn format_list(&self, entries: &[EntryInfo], technical: bool) -> String {
        let mut output = String::new();

        // Header
        if technical {
            output.push_str(&format!(
                "{:>12} {:>12} {:>10} {}\n",
                "Size", "Packed", "Method", "Name"
            ));
        } else {
            output.push_str(&format!("{:>12} {}\n", "Size", "Name"));
        }
        output.push_str(&"-".repeat(60));
        output.push('\n');

        let mut total_size = 0u64;
        let mut file_count = 0usize;
        let mut dir_count = 0usize;

        for entry in entries {
            let size = if entry.is_directory {
                "<DIR>".to_string()
            } else {
                humanize_bytes(entry.size)
            };

            if technical {
                output.push_str(&format!(
                    "{:>12} {:>12} {:>10} {}\n",
                    size,
                    humanize_bytes(entry.compressed_size),
                    format!("{:?}", entry.compression),
                    entry.name
                ));
            } else {
                output.push_str(&format!("{:>12} {}\n", size, entry.name));
            }

            if entry.is_directory {
                dir_count += 1;
            } else {
                file_count += 1;
                total_size += entry.size;
            }
        }

        // Footer
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:>12} {} files, {} directories\n",
            humanize_bytes(total_size),
            file_count,
            dir_count
        ));

        output
    }

    fn format_edit_result(&self, entry: &str, result: &EditResult) -> String {
        let action = if result.entry_added { "Added" } else { "Saved" };
        format!(
            "{}: {} ({})\n",
            action,
            entry,
            humanize_bytes(result.bytes_written)
        )
    }

    fn format_imported(&self, _source: &Path, entry: &str) -> String {
        format!("Imported {}\n", entry)
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl JsonFormatter {
    fn node_json(tree: &ArchiveTree, id: NodeId) -> Value {
        let node = tree.node(id);
        let mut obj = json!({
            "name": node.name(),
            "path": node.full_path(),
            "is_directory": node.is_directory(),
        });
        if node.is_directory() {
            obj["children"] = node
                .children()
                .iter()
                .map(|&child| Self::node_json(tree, child))
                .collect();
        }
        obj
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_created(&self, path: &Path, options: &StoreOptions) -> String {
        let obj = json!({
            "container": path.display().to_string(),
            "directories": options.skeleton.directories(),
            "metadata_entry": options.skeleton.metadata_entry_name(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_tree(&self, tree: &ArchiveTree) -> String {
        let roots: Vec<_> = tree
            .roots()
            .iter()
            .map(|&id| Self::node_json(tree, id))
            .collect();

        serde_json::to_string_pretty(&roots).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_list(&self, entries: &[EntryInfo], _technical: bool) -> String {
        let items: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "name": e.name,
                    "size": e.size,
                    "compressed_size": e.compressed_size,
                    "compression": format!("{:?}", e.compression),
                    "is_directory": e.is_directory,
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_edit_result(&self, entry: &str, result: &EditResult) -> String {
        let obj = json!({
            "entry": entry,
            "replaced": result.entry_replaced,
            "added": result.entry_added,
            "entries_kept": result.entries_kept,
            "bytes_written": result.bytes_written,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_imported(&self, source: &Path, entry: &str) -> String {
        let obj = json!({
            "source": source.display().to_string(),
            "entry": entry,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
