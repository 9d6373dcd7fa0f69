//! All I/O against the backing container file.
//!
//! A container is a ZIP archive. [`ArchiveStore`] opens it, does one thing,
//! and closes it again; no handle survives between calls.
//!
//! Mutations come in two flavors:
//!
//! - [`replace_entry`](ArchiveStore::replace_entry) rewrites the whole
//!   container. Every other entry is copied raw (same compression method,
//!   same compressed bytes, same header metadata) into a staging file, which
//!   then replaces the original through an atomic rename.
//! - [`append_entry`](ArchiveStore::append_entry) extends the container in
//!   place without touching existing entries.
//!
//! When a container holds the same name more than once, the reader keeps the
//! last copy. Reads see that copy, and a rewrite keeps only that copy.
//!
//! # Example
//!
//! ```rust,no_run
//! use tiwut::ArchiveStore;
//!
//! let store = ArchiveStore::new();
//! store.create("notes.tiwut")?;
//! store.append_entry("notes.tiwut", "data/todo.txt", b"milk")?;
//!
//! let result = store.replace_entry("notes.tiwut", "data/todo.txt", b"milk, eggs")?;
//! assert!(result.entry_replaced);
//! assert_eq!(store.read_entry("notes.tiwut", "data/todo.txt")?, b"milk, eggs");
//! # Ok::<(), tiwut::Error>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::archive_path::{self, ArchivePath};
use crate::options::{DuplicatePolicy, EntryCompression, Skeleton, StoreOptions};
use crate::staging::StagedFile;
use crate::timestamp::Timestamp;
use crate::{Error, Result};

/// Upper bound on the buffer reserved up front when reading an entry.
const MAX_PREALLOC: u64 = 1 << 20;

/// Metadata of one entry, as listed by [`ArchiveStore::entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Entry name. Directories end in `/`.
    pub name: String,
    /// Whether the entry is a directory.
    pub is_directory: bool,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Compressed size in bytes.
    pub compressed_size: u64,
    /// Compression method stored in the entry header.
    pub compression: CompressionMethod,
}

/// Result of a rewrite.
#[must_use = "edit result should be checked to verify operation completed as expected"]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditResult {
    /// Number of entries copied unchanged.
    pub entries_kept: usize,
    /// The target entry existed and its payload was replaced.
    pub entry_replaced: bool,
    /// The target entry did not exist and was added.
    pub entry_added: bool,
    /// Payload size of the written entry.
    pub bytes_written: u64,
}

impl EditResult {
    /// Returns the number of entries in the rewritten container.
    pub fn total_entries(&self) -> usize {
        self.entries_kept + usize::from(self.entry_replaced || self.entry_added)
    }
}

/// Reads and writes containers on disk.
#[derive(Debug, Clone, Default)]
pub struct ArchiveStore {
    options: StoreOptions,
}

impl ArchiveStore {
    /// Creates a store with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given options.
    pub fn with_options(options: StoreOptions) -> Self {
        Self { options }
    }

    /// Returns the store options.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Creates a new container holding the configured skeleton.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyExists`] if `path` exists and [`Error::Io`] if
    /// it cannot be created. Nothing is left at `path` on failure.
    pub fn create(&self, path: impl AsRef<Path>) -> Result<()> {
        self.create_with_skeleton(path, &self.options.skeleton)
    }

    /// Creates a new container holding `skeleton`.
    pub fn create_with_skeleton(&self, path: impl AsRef<Path>, skeleton: &Skeleton) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(Error::AlreadyExists {
                path: path.to_path_buf(),
            });
        }

        for dir in skeleton.directories() {
            ArchivePath::new(dir)?;
        }
        let metadata_entry = ArchivePath::new(skeleton.metadata_entry_name())?;

        let now = Timestamp::now();
        let options = self.file_options(self.options.compression, &now);

        let staged = StagedFile::new_file(path)?;
        {
            let mut writer = ZipWriter::new(BufWriter::new(staged.file()));
            for dir in skeleton.directories() {
                writer.add_directory(dir.as_str(), options)?;
            }
            writer.start_file(metadata_entry.as_str(), options)?;
            writer.write_all(now.created_at_text().as_bytes())?;
            writer.finish()?.flush()?;
        }
        staged.commit_new()?;

        log::info!(
            "created '{}' with {} entries",
            path.display(),
            skeleton.entry_count()
        );
        Ok(())
    }

    /// Returns all entry names, sorted lexicographically.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptArchive`] if the container cannot be parsed.
    pub fn list_entries(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        let archive = open_archive(path.as_ref())?;
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        log::debug!("listed {} entries in '{}'", names.len(), path.as_ref().display());
        Ok(names)
    }

    /// Returns entry metadata, sorted by name.
    pub fn entries(&self, path: impl AsRef<Path>) -> Result<Vec<EntryInfo>> {
        let mut archive = open_archive(path.as_ref())?;
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive.by_index_raw(i).map_err(corrupt_on_eof)?;
            entries.push(EntryInfo {
                name: file.name().to_string(),
                is_directory: file.is_dir(),
                size: file.size(),
                compressed_size: file.compressed_size(),
                compression: file.compression(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Returns `true` if the container has an entry called `entry_name`.
    pub fn contains(&self, path: impl AsRef<Path>, entry_name: &str) -> Result<bool> {
        let archive = open_archive(path.as_ref())?;
        Ok(archive.index_for_name(entry_name).is_some())
    }

    /// Reads the payload of one entry.
    ///
    /// Directory entries have an empty payload. Interpreting the bytes is up
    /// to the caller; see [`EntryContent`](crate::EntryContent).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] if there is no such entry and
    /// [`Error::CorruptArchive`] if the container or the entry data is damaged.
    pub fn read_entry(&self, path: impl AsRef<Path>, entry_name: &str) -> Result<Vec<u8>> {
        let mut archive = open_archive(path.as_ref())?;
        let mut file = match archive.by_name(entry_name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Err(Error::entry_not_found(entry_name)),
            Err(e) => return Err(corrupt_on_eof(e)),
        };

        let mut data = Vec::with_capacity(file.size().min(MAX_PREALLOC) as usize);
        file.read_to_end(&mut data).map_err(read_error)?;
        log::debug!("read {} bytes from '{}'", data.len(), entry_name);
        Ok(data)
    }

    /// Replaces the payload of one entry by rewriting the container.
    ///
    /// Every other entry is copied raw. The replaced entry keeps its position
    /// and, if it is stored or deflated, its compression method. An absent
    /// entry is added at the end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] if `entry_name` is a directory,
    /// [`Error::MalformedEntry`] for invalid names, and [`Error::Io`] if the
    /// staging file cannot be written or renamed. The original container is
    /// untouched on every error.
    pub fn replace_entry(
        &self,
        path: impl AsRef<Path>,
        entry_name: &str,
        data: &[u8],
    ) -> Result<EditResult> {
        self.rewrite(path.as_ref(), entry_name, data, StagedFile::commit)
    }

    /// The rewrite behind [`replace_entry`](Self::replace_entry), with the
    /// final commit step supplied by the caller.
    pub(crate) fn rewrite<F>(
        &self,
        path: &Path,
        entry_name: &str,
        data: &[u8],
        commit: F,
    ) -> Result<EditResult>
    where
        F: FnOnce(StagedFile) -> Result<()>,
    {
        let entry = ArchivePath::new(entry_name)?;
        if entry.is_directory() {
            return Err(Error::entry_not_found(entry_name));
        }

        let mut source = open_archive(path)?;
        let staged = StagedFile::new(path)?;
        let now = Timestamp::now();
        let mut result = EditResult {
            bytes_written: data.len() as u64,
            ..Default::default()
        };

        {
            let mut writer = ZipWriter::new(BufWriter::new(staged.file()));

            for i in 0..source.len() {
                let file = source.by_index_raw(i).map_err(corrupt_on_eof)?;
                if file.name() == entry_name {
                    let method = file.compression();
                    drop(file);
                    let compression = EntryCompression::from_method(method).unwrap_or_else(|| {
                        log::warn!(
                            "'{}' used {:?}; rewriting it with {:?}",
                            entry_name,
                            method,
                            self.options.compression
                        );
                        self.options.compression
                    });
                    writer.start_file(entry.as_str(), self.file_options(compression, &now))?;
                    writer.write_all(data)?;
                    result.entry_replaced = true;
                    continue;
                }

                writer.raw_copy_file(file)?;
                result.entries_kept += 1;
            }

            if !result.entry_replaced {
                writer.start_file(
                    entry.as_str(),
                    self.file_options(self.options.compression, &now),
                )?;
                writer.write_all(data)?;
                result.entry_added = true;
            }

            writer.finish()?.flush()?;
        }

        commit(staged)?;

        log::info!(
            "rewrote '{}': {} '{}' ({} bytes), kept {} entries",
            path.display(),
            if result.entry_replaced { "replaced" } else { "added" },
            entry_name,
            data.len(),
            result.entries_kept
        );
        Ok(result)
    }

    /// Adds one entry without rewriting existing ones.
    ///
    /// A name ending in `/` adds an empty directory entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateEntry`] if the name exists and the policy is
    /// [`DuplicatePolicy::Reject`]. With [`DuplicatePolicy::Replace`] an
    /// existing file entry is rewritten through
    /// [`replace_entry`](Self::replace_entry).
    pub fn append_entry(&self, path: impl AsRef<Path>, entry_name: &str, data: &[u8]) -> Result<()> {
        let path = path.as_ref();
        let entry = ArchivePath::new(entry_name)?;
        if entry.is_directory() && !data.is_empty() {
            return Err(Error::malformed(format!(
                "{:?}: directory entries carry no payload",
                entry_name
            )));
        }

        if self.contains(path, entry_name)? {
            return match self.options.duplicate_policy {
                DuplicatePolicy::Reject => Err(Error::DuplicateEntry {
                    path: entry_name.to_string(),
                }),
                DuplicatePolicy::Replace if entry.is_directory() => Ok(()),
                DuplicatePolicy::Replace => {
                    let _ = self.replace_entry(path, entry_name, data)?;
                    Ok(())
                }
            };
        }

        let now = Timestamp::now();
        let options = self.file_options(self.options.compression, &now);

        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let mut writer = ZipWriter::new_append(file).map_err(corrupt_on_eof)?;
        if entry.is_directory() {
            writer.add_directory(entry.as_str(), options)?;
        } else {
            writer.start_file(entry.as_str(), options)?;
            writer.write_all(data)?;
        }
        let file = writer.finish()?;
        file.sync_all()?;

        log::info!(
            "appended '{}' ({} bytes) to '{}'",
            entry_name,
            data.len(),
            path.display()
        );
        Ok(())
    }

    /// Copies an external file into `target_dir` of the container.
    ///
    /// The entry is named after the file's base name. Returns the entry name.
    pub fn import_file(
        &self,
        path: impl AsRef<Path>,
        source: impl AsRef<Path>,
        target_dir: &str,
    ) -> Result<String> {
        let source = source.as_ref();
        let entry_name = Self::import_entry_name(source, target_dir)?;
        let data = fs::read(source)?;
        self.append_entry(path, &entry_name, &data)?;
        Ok(entry_name)
    }

    /// Returns the entry name [`import_file`](Self::import_file) would use.
    pub fn import_entry_name(source: &Path, target_dir: &str) -> Result<String> {
        let base_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::malformed(format!(
                    "'{}' has no usable file name",
                    source.display()
                ))
            })?;
        Ok(archive_path::join(target_dir, base_name))
    }

    fn file_options(&self, compression: EntryCompression, now: &Timestamp) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(compression.method())
            .last_modified_time(now.to_zip())
    }
}

/// Opens a container read-only.
fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(path)?;
    parse_archive(BufReader::new(file))
}

fn parse_archive<R: Read + Seek>(reader: R) -> Result<ZipArchive<R>> {
    ZipArchive::new(reader).map_err(corrupt_on_eof)
}

/// A truncated container surfaces from the zip reader as an EOF I/O error.
fn corrupt_on_eof(err: ZipError) -> Error {
    match err {
        ZipError::Io(e) => read_error(e),
        other => other.into(),
    }
}

/// Maps decoder failures (bad CRC, bad deflate stream, truncation) to
/// `CorruptArchive` and leaves genuine I/O errors alone.
fn read_error(err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
            Error::CorruptArchive(err.to_string())
        }
        _ => Error::Io(err),
    }
}
