//! Interactive session over one container at a time.
//!
//! A [`Session`] holds the open container, its tree, and the current
//! selection, and pushes a notification to its [`SessionObserver`] after every
//! state transition. It is the only piece that a presentation layer talks to.
//!
//! | From | Call | To |
//! |------|------|----|
//! | any | `open`, `create_new` | `ContainerOpen` |
//! | `ContainerOpen`, `EntrySelected` | `select(file)` | `EntrySelected` |
//! | `ContainerOpen`, `EntrySelected` | `select(dir)` | `ContainerOpen` |
//! | `EntrySelected` | `save` | `EntrySelected` |
//! | `ContainerOpen`, `EntrySelected` | `import` | unchanged |
//!
//! Every failure leaves the previous state intact.
//!
//! # Example
//!
//! ```rust,no_run
//! use tiwut::{ArchiveStore, SaveOutcome, Session};
//!
//! let mut session = Session::new(ArchiveStore::new());
//! session.create_new("notes.tiwut")?;
//! session.select("meta/created_at.txt")?;
//!
//! if let SaveOutcome::Saved(result) = session.save("Created: a while ago")? {
//!     println!("kept {} entries", result.entries_kept);
//! }
//! # Ok::<(), tiwut::Error>(())
//! ```

use std::path::Path;

use crate::archive_path;
use crate::content::{DIRECTORY_PLACEHOLDER, EntryContent};
use crate::fs::ContainerFs;
use crate::store::{ArchiveStore, EditResult};
use crate::tree::ArchiveTree;
use crate::{Error, Result};

/// Editor label when nothing is selected.
pub const EMPTY_EDITOR_LABEL: &str = "File Preview / Editor";

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing opened yet.
    NoContainerOpen,
    /// A container is open and no file is selected.
    ContainerOpen,
    /// A container is open and a file entry is selected.
    EntrySelected,
}

/// What is selected in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A directory; never editable.
    Directory {
        /// Directory name, ending in `/`.
        path: String,
    },
    /// A file entry and the payload read when it was selected.
    File {
        /// Entry name.
        path: String,
        /// Payload, as text or opaque binary.
        content: EntryContent,
    },
}

impl Selection {
    /// Returns the selected path.
    pub fn path(&self) -> &str {
        match self {
            Selection::Directory { path } | Selection::File { path, .. } => path,
        }
    }
}

/// What the editor surface should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView {
    /// Caption above the editor.
    pub label: String,
    /// Editor contents.
    pub text: String,
    /// Whether the editor accepts input and can be saved.
    pub editable: bool,
}

/// Outcome of [`Session::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The entry was rewritten.
    Saved(EditResult),
    /// No container or no file is selected; nothing happened.
    NothingSelected,
    /// The selected file is binary; nothing happened.
    NotEditable,
}

/// Receives notifications from a [`Session`].
///
/// All methods default to doing nothing.
pub trait SessionObserver {
    /// Called with the rebuilt tree after open, create, save and import.
    fn on_tree(&mut self, tree: &ArchiveTree) {
        let _ = tree;
    }

    /// Called whenever the editor contents or editability change.
    fn on_editor(&mut self, view: &EditorView) {
        let _ = view;
    }

    /// Called with a one-line status message.
    fn on_status(&mut self, status: &str) {
        let _ = status;
    }
}

impl SessionObserver for () {}

#[derive(Debug)]
struct OpenContainer {
    fs: ContainerFs,
    tree: ArchiveTree,
    selection: Option<Selection>,
}

impl OpenContainer {
    /// The current tree of the container with `entry_name` added.
    fn tree_with(&self, entry_name: &str) -> Result<ArchiveTree> {
        let mut names = self.fs.store().list_entries(self.fs.path())?;
        names.push(entry_name.to_string());
        ArchiveTree::build(names)
    }
}

/// The interactive state machine.
pub struct Session {
    store: ArchiveStore,
    open: Option<OpenContainer>,
    observer: Box<dyn SessionObserver>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session without an observer.
    pub fn new(store: ArchiveStore) -> Self {
        Self::with_observer(store, ())
    }

    /// Creates a session that notifies `observer`.
    pub fn with_observer(store: ArchiveStore, observer: impl SessionObserver + 'static) -> Self {
        Self {
            store,
            open: None,
            observer: Box::new(observer),
        }
    }

    /// Returns the coarse state.
    pub fn state(&self) -> SessionState {
        match &self.open {
            None => SessionState::NoContainerOpen,
            Some(OpenContainer {
                selection: Some(Selection::File { .. }),
                ..
            }) => SessionState::EntrySelected,
            Some(_) => SessionState::ContainerOpen,
        }
    }

    /// Returns the open container's path.
    pub fn container_path(&self) -> Option<&Path> {
        self.open.as_ref().map(|open| open.fs.path())
    }

    /// Returns the current tree.
    pub fn tree(&self) -> Option<&ArchiveTree> {
        self.open.as_ref().map(|open| &open.tree)
    }

    /// Returns the current selection, file or directory.
    pub fn selection(&self) -> Option<&Selection> {
        self.open.as_ref().and_then(|open| open.selection.as_ref())
    }

    /// Returns the selected file entry, if a file is selected.
    pub fn selected_entry_path(&self) -> Option<&str> {
        match self.selection() {
            Some(Selection::File { path, .. }) => Some(path),
            _ => None,
        }
    }

    /// Returns what the editor should currently show.
    pub fn editor_view(&self) -> EditorView {
        match self.selection() {
            None => EditorView {
                label: EMPTY_EDITOR_LABEL.to_string(),
                text: String::new(),
                editable: false,
            },
            Some(Selection::Directory { path }) => EditorView {
                label: format!("Selected folder: {}", path),
                text: DIRECTORY_PLACEHOLDER.to_string(),
                editable: false,
            },
            Some(Selection::File { path, content }) => EditorView {
                label: format!("Editing: {}", path),
                text: content.display_text().to_string(),
                editable: content.is_editable(),
            },
        }
    }

    /// Creates a new container with the store's skeleton and opens it.
    pub fn create_new(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let fs = ContainerFs::create(path, self.store.clone())?;
        self.load(fs)?;
        self.observer.on_status("New container created");
        Ok(())
    }

    /// Opens an existing container, discarding the previous one.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let fs = ContainerFs::open(path, self.store.clone())?;
        self.load(fs)
    }

    /// Re-reads the tree of the open container, keeping the selection.
    pub fn reload(&mut self) -> Result<()> {
        let open = self.open.as_mut().ok_or(Error::NoContainerOpen)?;
        open.tree = open.fs.list_tree()?;
        self.observer.on_tree(&open.tree);
        Ok(())
    }

    fn load(&mut self, fs: ContainerFs) -> Result<()> {
        let tree = fs.list_tree()?;
        let status = format!("File: {}", fs.display_name());
        log::debug!("loaded '{}' ({} nodes)", fs.path().display(), tree.len());

        let open = self.open.insert(OpenContainer {
            fs,
            tree,
            selection: None,
        });
        self.observer.on_tree(&open.tree);
        self.notify_editor();
        self.observer.on_status(&status);
        Ok(())
    }

    /// Selects a tree path.
    ///
    /// A directory clears the file selection and disables the editor. A file
    /// is read immediately; binary payloads are shown but not editable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] for a directory that is not in the
    /// tree and for a file that is not in the container.
    pub fn select(&mut self, path: &str) -> Result<()> {
        let open = self.open.as_mut().ok_or(Error::NoContainerOpen)?;

        let is_directory = match open.tree.is_directory(path) {
            Some(is_directory) => is_directory,
            None if archive_path::is_directory(path) => {
                return Err(Error::entry_not_found(path));
            }
            None => false,
        };
        let selection = if is_directory {
            Selection::Directory {
                path: path.to_string(),
            }
        } else {
            let content = open.fs.get_entry_text(path)?;
            Selection::File {
                path: path.to_string(),
                content,
            }
        };

        open.selection = Some(selection);
        self.notify_editor();
        Ok(())
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        if let Some(open) = self.open.as_mut() {
            open.selection = None;
            self.notify_editor();
        }
    }

    /// Saves `new_content` into the selected file.
    ///
    /// Without a selected file, or with a binary file selected, this is a
    /// no-op reported through [`SaveOutcome`].
    ///
    /// The refreshed tree is built before the container is rewritten, so an
    /// error always means nothing was saved.
    pub fn save(&mut self, new_content: &str) -> Result<SaveOutcome> {
        let Some(open) = self.open.as_mut() else {
            return Ok(SaveOutcome::NothingSelected);
        };
        let path = match &open.selection {
            Some(Selection::File {
                content: EntryContent::Binary(_),
                ..
            }) => return Ok(SaveOutcome::NotEditable),
            Some(Selection::File { path, .. }) => path.clone(),
            _ => return Ok(SaveOutcome::NothingSelected),
        };

        let tree = open.tree_with(&path)?;

        let result = open.fs.save_entry_text(&path, new_content)?;
        open.selection = Some(Selection::File {
            path: path.clone(),
            content: EntryContent::Text(new_content.to_string()),
        });
        open.tree = tree;

        self.observer.on_tree(&open.tree);
        self.observer.on_status(&format!("Saved: {}", path));
        Ok(SaveOutcome::Saved(result))
    }

    /// Returns the directory an import would land in.
    ///
    /// A selected directory is used as is, a selected file contributes its
    /// parent directory, and without a selection the store's default import
    /// directory applies.
    pub fn import_target(&self) -> Option<String> {
        let open = self.open.as_ref()?;
        let target = match &open.selection {
            Some(Selection::Directory { path }) => path.clone(),
            Some(Selection::File { path, .. }) => {
                archive_path::parent_directory(path).to_string()
            }
            None => self.store.options().default_import_dir.clone(),
        };
        Some(target)
    }

    /// Imports an external file next to the current selection.
    ///
    /// Returns the new entry name.
    pub fn import(&mut self, source: impl AsRef<Path>) -> Result<String> {
        let target = self.import_target().ok_or(Error::NoContainerOpen)?;
        self.import_into(source, &target)
    }

    /// Imports an external file into an explicit directory.
    pub fn import_into(&mut self, source: impl AsRef<Path>, target_dir: &str) -> Result<String> {
        let open = self.open.as_mut().ok_or(Error::NoContainerOpen)?;

        let source = source.as_ref();
        let entry_name = ArchiveStore::import_entry_name(source, target_dir)?;
        let tree = open.tree_with(&entry_name)?;

        open.fs.import_external_file(source, target_dir)?;
        open.tree = tree;

        self.observer.on_tree(&open.tree);
        self.observer.on_status(&format!(
            "File imported to '{}'",
            archive_path::parent_directory(&entry_name)
        ));
        Ok(entry_name)
    }

    fn notify_editor(&mut self) {
        let view = self.editor_view();
        self.observer.on_editor(&view);
    }
}
