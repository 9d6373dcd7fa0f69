//! Command implementations for the CLI tool.

use std::io::{Read, Write};
use std::path::Path;

use tiwut::{
    ArchiveStore, ContainerFs, DuplicatePolicy, EntryContent, Session, SessionObserver,
    StoreOptions,
};

use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::create_formatter;
use crate::{CompressionMethod, OutputFormat};

/// Configuration for the import command.
pub struct ImportConfig<'a> {
    pub container_path: &'a Path,
    pub source: &'a Path,
    pub target_dir: Option<&'a str>,
    pub replace: bool,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Prints session status lines to stderr.
struct StatusLine {
    quiet: bool,
}

impl SessionObserver for StatusLine {
    fn on_status(&mut self, status: &str) {
        if !self.quiet {
            eprintln!("{}", status);
        }
    }
}

/// Create command implementation
pub fn create(
    container_path: &Path,
    method: CompressionMethod,
    format: OutputFormat,
    quiet: bool,
) -> ExitCode {
    let formatter = create_formatter(format);
    let store = ArchiveStore::with_options(StoreOptions::new().compression(method.into()));

    if let Err(e) = store.create(container_path) {
        eprintln!("Error creating container: {}", e);
        return error_to_exit_code(&e);
    }

    if !quiet || format == OutputFormat::Json {
        print!("{}", formatter.format_created(container_path, store.options()));
    }
    ExitCode::Success
}

/// Tree command implementation
pub fn tree(container_path: &Path, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    let fs = match open_container(container_path, ArchiveStore::new()) {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    match fs.list_tree() {
        Ok(tree) => {
            print!("{}", formatter.format_tree(&tree));
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error reading container: {}", e);
            error_to_exit_code(&e)
        }
    }
}

/// List command implementation
pub fn list(container_path: &Path, technical: bool, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    match ArchiveStore::new().entries(container_path) {
        Ok(entries) => {
            print!("{}", formatter.format_list(&entries, technical));
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error opening container: {}", e);
            error_to_exit_code(&e)
        }
    }
}

/// Cat command implementation
pub fn cat(container_path: &Path, entry: &str, raw: bool) -> ExitCode {
    let fs = match open_container(container_path, ArchiveStore::new()) {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    let content = match fs.get_entry_text(entry) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading '{}': {}", entry, e);
            return error_to_exit_code(&e);
        }
    };

    let mut stdout = std::io::stdout().lock();
    let written = match &content {
        EntryContent::Text(text) => stdout.write_all(text.as_bytes()),
        EntryContent::Binary(bytes) if raw => stdout.write_all(bytes),
        EntryContent::Binary(_) => writeln!(stdout, "{}", content.display_text()),
    };

    match written.and_then(|()| stdout.flush()) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error writing output: {}", e);
            ExitCode::IoError
        }
    }
}

/// Write command implementation
pub fn write(
    container_path: &Path,
    entry: &str,
    input: Option<&Path>,
    format: OutputFormat,
    quiet: bool,
) -> ExitCode {
    let formatter = create_formatter(format);

    let text = match read_input(input) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            return ExitCode::IoError;
        }
    };

    let fs = match open_container(container_path, ArchiveStore::new()) {
        Ok(fs) => fs,
        Err(code) => return code,
    };

    match fs.save_entry_text(entry, &text) {
        Ok(result) => {
            if !quiet || format == OutputFormat::Json {
                print!("{}", formatter.format_edit_result(entry, &result));
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error writing '{}': {}", entry, e);
            error_to_exit_code(&e)
        }
    }
}

/// Import command implementation
pub fn import(config: &ImportConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let policy = if config.replace {
        DuplicatePolicy::Replace
    } else {
        DuplicatePolicy::Reject
    };
    let store = ArchiveStore::with_options(StoreOptions::new().duplicate_policy(policy));

    // Status lines are human output; JSON mode keeps stderr for errors only
    let mut session = Session::with_observer(
        store,
        StatusLine {
            quiet: config.quiet || config.format == OutputFormat::Json,
        },
    );

    if let Err(e) = session.open(config.container_path) {
        eprintln!("Error opening container: {}", e);
        return error_to_exit_code(&e);
    }

    let imported = match config.target_dir {
        Some(dir) => session.import_into(config.source, dir),
        None => session.import(config.source),
    };

    match imported {
        Ok(entry_name) => {
            if config.format == OutputFormat::Json {
                print!("{}", formatter.format_imported(config.source, &entry_name));
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error importing '{}': {}", config.source.display(), e);
            error_to_exit_code(&e)
        }
    }
}

fn open_container(path: &Path, store: ArchiveStore) -> Result<ContainerFs, ExitCode> {
    ContainerFs::open(path, store).map_err(|e| {
        eprintln!("Error opening container: {}", e);
        error_to_exit_code(&e)
    })
}

fn read_input(input: Option<&Path>) -> std::io::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
