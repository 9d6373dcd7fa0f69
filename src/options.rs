//! Store configuration.
//!
//! [`StoreOptions`] is a plain builder. There is no config file and no
//! environment lookup; callers that want either parse it themselves and feed
//! the result in here.
//!
//! # Example
//!
//! ```rust
//! use tiwut::{ArchiveStore, DuplicatePolicy, EntryCompression, StoreOptions};
//!
//! let options = StoreOptions::new()
//!     .compression(EntryCompression::Stored)
//!     .duplicate_policy(DuplicatePolicy::Replace);
//! let store = ArchiveStore::with_options(options);
//! ```

use zip::CompressionMethod;

/// The top-level directories every new container receives.
pub const DEFAULT_DIRECTORIES: [&str; 8] = [
    "data/",
    "info/",
    "storage/",
    "user/",
    "meta/",
    "app/",
    "filesystem/",
    "temp/",
];

/// Entry holding the creation timestamp of a container.
pub const CREATED_AT_ENTRY: &str = "meta/created_at.txt";

/// Default target directory for imports when nothing is selected.
pub const DEFAULT_IMPORT_DIR: &str = "data/";

/// Compression method for newly written entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryCompression {
    /// Deflate (the container default).
    #[default]
    Deflated,
    /// No compression.
    Stored,
}

impl EntryCompression {
    pub(crate) fn method(self) -> CompressionMethod {
        match self {
            Self::Deflated => CompressionMethod::Deflated,
            Self::Stored => CompressionMethod::Stored,
        }
    }

    /// Maps an existing entry's method back, if it is one we write.
    pub(crate) fn from_method(method: CompressionMethod) -> Option<Self> {
        match method {
            CompressionMethod::Deflated => Some(Self::Deflated),
            CompressionMethod::Stored => Some(Self::Stored),
            _ => None,
        }
    }
}

/// What `append_entry` does when the name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`Error::DuplicateEntry`](crate::Error::DuplicateEntry).
    #[default]
    Reject,
    /// Rewrite the existing entry with the new payload.
    Replace,
}

/// The fixed directory layout written by `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    directories: Vec<String>,
    metadata_entry: String,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self {
            directories: DEFAULT_DIRECTORIES.iter().map(|d| d.to_string()).collect(),
            metadata_entry: CREATED_AT_ENTRY.to_string(),
        }
    }
}

impl Skeleton {
    /// Creates a skeleton from directory names.
    ///
    /// A missing trailing `/` is added. The metadata entry stays
    /// `meta/created_at.txt`.
    pub fn new<I, S>(directories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let directories = directories
            .into_iter()
            .map(|d| {
                let mut d = d.into();
                if !d.ends_with('/') {
                    d.push('/');
                }
                d
            })
            .collect();
        Self {
            directories,
            metadata_entry: CREATED_AT_ENTRY.to_string(),
        }
    }

    /// Sets the name of the creation-timestamp entry.
    pub fn metadata_entry(mut self, name: impl Into<String>) -> Self {
        self.metadata_entry = name.into();
        self
    }

    /// Returns the directory names, each ending in `/`.
    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    /// Returns the name of the creation-timestamp entry.
    pub fn metadata_entry_name(&self) -> &str {
        &self.metadata_entry
    }

    /// Returns the number of entries a fresh container holds.
    pub fn entry_count(&self) -> usize {
        self.directories.len() + 1
    }
}

/// Options controlling how the store writes containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Method for newly written entries.
    pub compression: EntryCompression,
    /// Behavior of appends onto an existing name.
    pub duplicate_policy: DuplicatePolicy,
    /// Layout of newly created containers.
    pub skeleton: Skeleton,
    /// Import target when the selection does not resolve one.
    pub default_import_dir: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            compression: EntryCompression::default(),
            duplicate_policy: DuplicatePolicy::default(),
            skeleton: Skeleton::default(),
            default_import_dir: DEFAULT_IMPORT_DIR.to_string(),
        }
    }
}

impl StoreOptions {
    /// Creates options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression method for new entries.
    pub fn compression(mut self, compression: EntryCompression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the duplicate-name policy for appends.
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Sets the skeleton written by `create`.
    pub fn skeleton(mut self, skeleton: Skeleton) -> Self {
        self.skeleton = skeleton;
        self
    }

    /// Sets the default import directory. A trailing `/` is added if missing.
    pub fn default_import_dir(mut self, dir: impl Into<String>) -> Self {
        let mut dir = dir.into();
        if !dir.is_empty() && !dir.ends_with('/') {
            dir.push('/');
        }
        self.default_import_dir = dir;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_skeleton() {
        let skeleton = Skeleton::default();
        assert_eq!(skeleton.directories().len(), 8);
        assert_eq!(skeleton.directories()[0], "data/");
        assert_eq!(skeleton.metadata_entry_name(), "meta/created_at.txt");
        assert_eq!(skeleton.entry_count(), 9);
    }

    #[test]
    fn test_custom_skeleton_adds_slash() {
        let skeleton = Skeleton::new(["docs", "meta/"]).metadata_entry("meta/stamp.txt");
        assert_eq!(skeleton.directories(), &["docs/", "meta/"]);
        assert_eq!(skeleton.metadata_entry_name(), "meta/stamp.txt");
    }

    #[test]
    fn test_options_builder() {
        let options = StoreOptions::new()
            .compression(EntryCompression::Stored)
            .duplicate_policy(DuplicatePolicy::Replace)
            .default_import_dir("user");
        assert_eq!(options.compression, EntryCompression::Stored);
        assert_eq!(options.duplicate_policy, DuplicatePolicy::Replace);
        assert_eq!(options.default_import_dir, "user/");
    }

    #[test]
    fn test_compression_method_mapping() {
        assert_eq!(
            EntryCompression::from_method(CompressionMethod::Stored),
            Some(EntryCompression::Stored)
        );
        assert_eq!(
            EntryCompression::Deflated.method(),
            CompressionMethod::Deflated
        );
    }
}
