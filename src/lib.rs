//! # tiwut
//!
//! An archive-backed virtual filesystem for TIWUT containers.
//!
//! A TIWUT container is a single ZIP file with a fixed set of top-level
//! directories. This crate turns its flat entry list into a navigable tree,
//! reads and edits individual entries, and imports external files, without
//! ever leaving a half-written container behind.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tiwut::{ArchiveStore, ArchiveTree, Result};
//!
//! fn main() -> Result<()> {
//!     let store = ArchiveStore::new();
//!
//!     // data/ info/ storage/ user/ meta/ app/ filesystem/ temp/ + meta/created_at.txt
//!     store.create("box.tiwut")?;
//!     store.append_entry("box.tiwut", "data/notes.txt", b"hello")?;
//!
//!     let tree = ArchiveTree::build(store.list_entries("box.tiwut")?)?;
//!     for (depth, node) in tree.walk() {
//!         println!("{}{}", "  ".repeat(depth), node.label());
//!     }
//!
//!     // Rewrites the container through a staging file and an atomic rename
//!     let result = store.replace_entry("box.tiwut", "data/notes.txt", b"world")?;
//!     println!("kept {} entries", result.entries_kept);
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! | Module | Role |
//! |--------|------|
//! | [`archive_path`] | Pure helpers over `/`-separated entry names |
//! | [`tree`] | Flat names to [`ArchiveTree`] |
//! | [`store`] | All container I/O ([`ArchiveStore`]) |
//! | [`fs`] | One container bound to a store ([`ContainerFs`]) |
//! | [`session`] | Open container + selection + notifications ([`Session`]) |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | The `tiwut` command-line tool |
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade. Install any
//! compatible logger to see per-operation detail.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod archive_path;
pub mod content;
pub mod error;
pub mod fs;
pub mod options;
pub mod session;
pub mod staging;
pub mod store;
pub mod timestamp;
pub mod tree;

pub use archive_path::ArchivePath;
pub use content::{BINARY_PLACEHOLDER, DIRECTORY_PLACEHOLDER, EntryContent};
pub use error::{Error, Result};
pub use fs::ContainerFs;
pub use options::{
    CREATED_AT_ENTRY, DEFAULT_DIRECTORIES, DEFAULT_IMPORT_DIR, DuplicatePolicy, EntryCompression,
    Skeleton, StoreOptions,
};
pub use session::{EditorView, SaveOutcome, Selection, Session, SessionObserver, SessionState};
pub use store::{ArchiveStore, EditResult, EntryInfo};
pub use timestamp::Timestamp;
pub use tree::{ArchiveTree, ArchiveTreeBuilder, NodeId, TreeNode};

// Re-exported so callers can match on `EntryInfo::compression`
pub use zip::CompressionMethod;
