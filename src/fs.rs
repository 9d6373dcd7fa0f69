//! Filesystem-style access to one container.
//!
//! [`ContainerFs`] binds an [`ArchiveStore`] to a container path and exposes
//! the operations a presentation layer needs: the tree to render, entry text
//! to show, text to save back, and external files to import.
//!
//! # Example
//!
//! ```rust,no_run
//! use tiwut::{ArchiveStore, ContainerFs, EntryContent};
//!
//! let fs = ContainerFs::open("notes.tiwut", ArchiveStore::new())?;
//!
//! for (depth, node) in fs.list_tree()?.walk() {
//!     println!("{}{}", "  ".repeat(depth), node.label());
//! }
//!
//! if let EntryContent::Text(text) = fs.get_entry_text("meta/created_at.txt")? {
//!     fs.save_entry_text("meta/created_at.txt", &text.to_uppercase())?;
//! }
//! # Ok::<(), tiwut::Error>(())
//! ```

use std::path::{Path, PathBuf};

use crate::archive_path;
use crate::content::EntryContent;
use crate::store::{ArchiveStore, EditResult};
use crate::tree::ArchiveTree;
use crate::{Error, Result};

/// One container, opened for browsing and editing.
///
/// No file handle is held; every call opens and closes the container.
#[derive(Debug, Clone)]
pub struct ContainerFs {
    path: PathBuf,
    store: ArchiveStore,
}

impl ContainerFs {
    /// Binds to an existing container after checking that it parses.
    pub fn open(path: impl AsRef<Path>, store: ArchiveStore) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        store.list_entries(&path)?;
        Ok(Self { path, store })
    }

    /// Creates a new container with the store's skeleton and binds to it.
    pub fn create(path: impl AsRef<Path>, store: ArchiveStore) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        store.create(&path)?;
        Ok(Self { path, store })
    }

    /// Returns the container path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &ArchiveStore {
        &self.store
    }

    /// Returns the container's file name, for status display.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Builds the current tree.
    pub fn list_tree(&self) -> Result<ArchiveTree> {
        let names = self.store.list_entries(&self.path)?;
        ArchiveTree::build(names)
    }

    /// Reads an entry for display.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEditable`] for directory names and
    /// [`Error::EntryNotFound`] for absent entries.
    pub fn get_entry_text(&self, entry_name: &str) -> Result<EntryContent> {
        if archive_path::is_directory(entry_name) {
            return Err(Error::NotEditable {
                path: entry_name.to_string(),
            });
        }
        let bytes = self.store.read_entry(&self.path, entry_name)?;
        Ok(EntryContent::from_bytes(bytes))
    }

    /// Writes text back into an entry, rewriting the container.
    pub fn save_entry_text(&self, entry_name: &str, text: &str) -> Result<EditResult> {
        if archive_path::is_directory(entry_name) {
            return Err(Error::NotEditable {
                path: entry_name.to_string(),
            });
        }
        self.store
            .replace_entry(&self.path, entry_name, text.as_bytes())
    }

    /// Imports an external file into `target_dir`. Returns the new entry name.
    pub fn import_external_file(
        &self,
        source: impl AsRef<Path>,
        target_dir: &str,
    ) -> Result<String> {
        self.store.import_file(&self.path, source, target_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_then_tree() {
        let temp_dir = TempDir::new().unwrap();
        let fs = ContainerFs::create(temp_dir.path().join("a.tiwut"), ArchiveStore::new()).unwrap();

        let tree = fs.list_tree().unwrap();
        assert_eq!(tree.roots().len(), 8);
        assert_eq!(tree.is_directory("meta/created_at.txt"), Some(false));
        assert_eq!(fs.display_name(), "a.tiwut");
    }

    #[test]
    fn test_open_rejects_non_archive() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plain.tiwut");
        std::fs::write(&path, b"plain text").unwrap();

        let err = ContainerFs::open(&path, ArchiveStore::new()).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_directories_are_not_editable() {
        let temp_dir = TempDir::new().unwrap();
        let fs = ContainerFs::create(temp_dir.path().join("a.tiwut"), ArchiveStore::new()).unwrap();

        assert!(matches!(
            fs.get_entry_text("data/"),
            Err(Error::NotEditable { .. })
        ));
        assert!(matches!(
            fs.save_entry_text("data/", "x"),
            Err(Error::NotEditable { .. })
        ));
    }

    #[test]
    fn test_text_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let fs = ContainerFs::create(temp_dir.path().join("a.tiwut"), ArchiveStore::new()).unwrap();

        let result = fs.save_entry_text("user/profile.txt", "name = ada").unwrap();
        assert!(result.entry_added);
        assert_eq!(
            fs.get_entry_text("user/profile.txt").unwrap(),
            EntryContent::Text("name = ada".into())
        );
    }

    #[test]
    fn test_import_external_file() {
        let temp_dir = TempDir::new().unwrap();
        let fs = ContainerFs::create(temp_dir.path().join("a.tiwut"), ArchiveStore::new()).unwrap();
        let source = temp_dir.path().join("logo.bin");
        std::fs::write(&source, [0x89, 0x50, 0xff, 0x00]).unwrap();

        let name = fs.import_external_file(&source, "app/").unwrap();
        assert_eq!(name, "app/logo.bin");
        assert!(matches!(
            fs.get_entry_text("app/logo.bin").unwrap(),
            EntryContent::Binary(_)
        ));
    }
}
