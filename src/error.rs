//! Error types for container operations.
//!
//! This module provides the [`Error`] enum which represents every failure a
//! container operation can surface, along with a convenient [`Result<T>`]
//! type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Nothing in
//! the store or the tree builder swallows an error; the [`Session`] decides
//! what is recoverable, and every failure leaves the previous session state
//! intact.
//!
//! ```rust,no_run
//! use tiwut::{ArchiveStore, Error};
//!
//! let store = ArchiveStore::new();
//! match store.read_entry("notes.tiwut", "data/todo.txt") {
//!     Ok(bytes) => println!("{} bytes", bytes.len()),
//!     Err(Error::EntryNotFound { path }) => eprintln!("no such entry: {}", path),
//!     Err(Error::CorruptArchive(reason)) => eprintln!("damaged container: {}", reason),
//!     Err(e) => eprintln!("error: {}", e),
//! }
//! ```
//!
//! Undecodable payloads are not errors: they are reported as
//! [`EntryContent::Binary`](crate::EntryContent::Binary).
//!
//! [`Session`]: crate::Session

use std::io;
use std::path::PathBuf;

use zip::result::ZipError;

/// The main error type for container operations.
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io], [`AlreadyExists`][Self::AlreadyExists] | File cannot be opened, created or renamed |
/// | Format | [`CorruptArchive`][Self::CorruptArchive] | Bad signature, truncated index, unsupported method |
/// | Lookup | [`EntryNotFound`][Self::EntryNotFound], [`DuplicateEntry`][Self::DuplicateEntry] | Entry name does (not) exist |
/// | Input | [`MalformedEntry`][Self::MalformedEntry], [`NotEditable`][Self::NotEditable] | Invalid name or directory edit |
/// | Session | [`NoContainerOpen`][Self::NoContainerOpen] | Operation before open/create |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while opening, creating, writing or renaming
    /// the container file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The target of a create operation already exists.
    #[error("Container already exists: {}", path.display())]
    AlreadyExists {
        /// The path that was about to be created.
        path: PathBuf,
    },

    /// The container cannot be parsed as a valid archive.
    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    /// The requested entry does not exist, or names a directory where a file
    /// payload was expected.
    #[error("Entry not found: {path}")]
    EntryNotFound {
        /// The entry name that was looked up.
        path: String,
    },

    /// An entry with the same name is already present.
    #[error("Entry already exists: {path}")]
    DuplicateEntry {
        /// The conflicting entry name.
        path: String,
    },

    /// An entry name is empty or could escape the container root.
    #[error("Malformed entry name: {0}")]
    MalformedEntry(String),

    /// The operation needs an open container and none is open.
    #[error("No container is open")]
    NoContainerOpen,

    /// The selected entry cannot be edited as text.
    #[error("Entry is not editable: {path}")]
    NotEditable {
        /// The entry name.
        path: String,
    },
}

impl Error {
    /// Returns `true` if the container itself is damaged.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::CorruptArchive(_))
    }

    /// Returns `true` if the error reports a missing entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::EntryNotFound { .. })
    }

    /// Returns the entry name associated with this error, if any.
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Error::EntryNotFound { path }
            | Error::DuplicateEntry { path }
            | Error::NotEditable { path } => Some(path),
            _ => None,
        }
    }

    /// Creates an `EntryNotFound` error.
    pub fn entry_not_found(path: impl Into<String>) -> Self {
        Error::EntryNotFound { path: path.into() }
    }

    /// Creates a `MalformedEntry` error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedEntry(reason.into())
    }
}

impl From<ZipError> for Error {
    fn from(err: ZipError) -> Self {
        match err {
            ZipError::Io(e) => Error::Io(e),
            ZipError::FileNotFound => Error::EntryNotFound {
                path: String::new(),
            },
            // InvalidArchive, UnsupportedArchive and any future variant
            other => Error::CorruptArchive(other.to_string()),
        }
    }
}

/// A specialized Result type for container operations.
pub type Result<T> = std::result::Result<T, Error>;
