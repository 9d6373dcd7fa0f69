//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::TempDir;
use tiwut::{ArchiveStore, ArchiveTree, EditorView, SessionObserver};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// The default skeleton: eight directories plus the metadata entry.
pub const SKELETON_ENTRIES: [&str; 9] = [
    "app/",
    "data/",
    "filesystem/",
    "info/",
    "meta/",
    "meta/created_at.txt",
    "storage/",
    "temp/",
    "user/",
];

/// Creates a fresh container with the default skeleton in a new temp dir.
pub fn new_container() -> (TempDir, PathBuf, ArchiveStore) {
    new_container_with(ArchiveStore::new())
}

/// Creates a fresh container with `store`'s skeleton in a new temp dir.
pub fn new_container_with(store: ArchiveStore) -> (TempDir, PathBuf, ArchiveStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("test.tiwut");
    store.create(&path).expect("Failed to create container");
    (temp_dir, path, store)
}

/// Writes a raw ZIP file with the given entries, bypassing name validation.
///
/// Names ending in `/` become directory entries.
pub fn write_raw_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).expect("Failed to create zip");
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, data) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(*name, options)
                .expect("Failed to add directory");
        } else {
            writer.start_file(*name, options).expect("Failed to start file");
            writer.write_all(data).expect("Failed to write data");
        }
    }
    writer.finish().expect("Failed to finish zip");
}

/// Writes a raw ZIP in which `name` is stored twice: `first`, then the
/// `between` entries, then `second`.
///
/// `ZipWriter` refuses duplicate names, so the second copy is written under a
/// placeholder of the same length and renamed in the finished bytes.
pub fn write_zip_with_duplicate(
    path: &Path,
    name: &str,
    first: &[u8],
    between: &[(&str, &[u8])],
    second: &[u8],
) {
    let last = if name.ends_with('~') { "#" } else { "~" };
    let placeholder = format!("{}{}", &name[..name.len() - 1], last);

    let mut entries = vec![(name, first)];
    entries.extend_from_slice(between);
    entries.push((placeholder.as_str(), second));
    write_raw_zip(path, &entries);

    let mut bytes = std::fs::read(path).expect("Failed to read zip");
    let (from, to) = (placeholder.as_bytes(), name.as_bytes());
    let mut i = 0;
    while i + from.len() <= bytes.len() {
        if &bytes[i..i + from.len()] == from {
            bytes[i..i + from.len()].copy_from_slice(to);
            i += from.len();
        } else {
            i += 1;
        }
    }
    std::fs::write(path, bytes).expect("Failed to write zip");
}

/// Returns `true` if `needle` occurs anywhere in `haystack`.
pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Writes an external file to import.
pub fn external_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).expect("Failed to write external file");
    path
}

/// Collects tree paths in walk order.
pub fn tree_paths(tree: &ArchiveTree) -> Vec<String> {
    tree.walk()
        .into_iter()
        .map(|(_, node)| node.full_path().to_string())
        .collect()
}

/// Every notification a session pushed, in order.
#[derive(Debug, Default)]
pub struct Recorded {
    pub trees: Vec<Vec<String>>,
    pub editors: Vec<EditorView>,
    pub statuses: Vec<String>,
}

/// Observer that records into shared state the test keeps a handle to.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver(pub Rc<RefCell<Recorded>>);

impl RecordingObserver {
    pub fn new() -> (Self, Rc<RefCell<Recorded>>) {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        (Self(Rc::clone(&recorded)), recorded)
    }
}

impl SessionObserver for RecordingObserver {
    fn on_tree(&mut self, tree: &ArchiveTree) {
        self.0.borrow_mut().trees.push(tree_paths(tree));
    }

    fn on_editor(&mut self, view: &EditorView) {
        self.0.borrow_mut().editors.push(view.clone());
    }

    fn on_status(&mut self, status: &str) {
        self.0.borrow_mut().statuses.push(status.to_string());
    }
}
