//! Stage-then-rename writes.
//!
//! ZIP has no in-place update, so every rewrite produces a complete new
//! container. The new bytes go to a temporary file in the same directory as
//! the target and only replace it through a rename once they are fully
//! written and synced. The target is never opened for writing, so an
//! interrupted rewrite leaves the previous container untouched.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// A temporary file that will atomically replace `target` on commit.
///
/// Dropping a `StagedFile` without committing removes the temporary file.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    /// Creates a staging file next to `target`.
    ///
    /// The staging file lives in the target's directory so the final rename
    /// never crosses a filesystem boundary.
    pub fn new(target: impl AsRef<Path>) -> Result<Self> {
        Self::stage(target.as_ref(), None)
    }

    /// Creates a staging file for a target that does not exist yet.
    ///
    /// The file gets the mode any newly created file would get (`0o666`
    /// minus the umask on Unix) instead of the private `0o600` used for
    /// rewrites, which copy the target's mode on commit.
    pub fn new_file(target: impl AsRef<Path>) -> Result<Self> {
        #[cfg(unix)]
        let permissions = {
            use std::os::unix::fs::PermissionsExt;
            Some(fs::Permissions::from_mode(0o666))
        };
        #[cfg(not(unix))]
        let permissions = None;

        Self::stage(target.as_ref(), permissions)
    }

    fn stage(target: &Path, permissions: Option<fs::Permissions>) -> Result<Self> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut builder = tempfile::Builder::new();
        builder.prefix(".tiwut-").suffix(".tmp");
        if let Some(permissions) = permissions {
            builder.permissions(permissions);
        }
        let file = builder.tempfile_in(dir)?;
        log::debug!(
            "staging '{}' at '{}'",
            target.display(),
            file.path().display()
        );
        Ok(Self {
            file,
            target: target.to_path_buf(),
        })
    }

    /// Returns the staging file for writing.
    pub fn file(&self) -> &File {
        self.file.as_file()
    }

    /// Returns the path of the staging file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the path this file will replace.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Syncs the staged bytes and renames them over the target.
    ///
    /// The target keeps its permissions. On failure the staging file is
    /// removed and the target is unchanged.
    pub fn commit(self) -> Result<()> {
        self.file.as_file().sync_all()?;
        if let Ok(meta) = fs::metadata(&self.target) {
            fs::set_permissions(self.file.path(), meta.permissions())?;
        }
        let target = self.target;
        self.file.persist(&target).map_err(|e| Error::Io(e.error))?;
        log::debug!("committed '{}'", target.display());
        Ok(())
    }

    /// Like [`commit`](Self::commit), but fails if the target already exists.
    ///
    /// Pair with [`new_file`](Self::new_file).
    pub fn commit_new(self) -> Result<()> {
        self.file.as_file().sync_all()?;
        let target = self.target;
        self.file.persist_noclobber(&target).map_err(|e| {
            if e.error.kind() == io::ErrorKind::AlreadyExists {
                Error::AlreadyExists {
                    path: target.clone(),
                }
            } else {
                Error::Io(e.error)
            }
        })?;
        log::debug!("committed new '{}'", target.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn staging_files(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(".tiwut-"))
            })
            .collect()
    }

    #[test]
    fn test_commit_replaces_target() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("box.tiwut");
        fs::write(&target, b"old").unwrap();

        let staged = StagedFile::new(&target).unwrap();
        assert_eq!(staged.path().parent(), Some(temp_dir.path()));
        staged.file().write_all(b"new").unwrap();
        staged.commit().unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert!(staging_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_drop_discards_staging() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("box.tiwut");
        fs::write(&target, b"old").unwrap();

        {
            let staged = StagedFile::new(&target).unwrap();
            staged.file().write_all(b"partial").unwrap();
        }

        assert_eq!(fs::read(&target).unwrap(), b"old");
        assert!(staging_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_commit_new_refuses_existing() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("box.tiwut");
        fs::write(&target, b"keep").unwrap();

        let staged = StagedFile::new(&target).unwrap();
        staged.file().write_all(b"other").unwrap();
        let err = staged.commit_new().unwrap_err();

        assert!(matches!(err, Error::AlreadyExists { .. }));
        assert_eq!(fs::read(&target).unwrap(), b"keep");
        assert!(staging_files(temp_dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_commit_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("box.tiwut");
        fs::write(&target, b"old").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o640)).unwrap();

        let staged = StagedFile::new(&target).unwrap();
        staged.file().write_all(b"new").unwrap();
        staged.commit().unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_gets_default_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let reference = temp_dir.path().join("reference");
        File::create(&reference).unwrap();
        let expected = fs::metadata(&reference).unwrap().permissions().mode() & 0o777;

        let target = temp_dir.path().join("box.tiwut");
        let staged = StagedFile::new_file(&target).unwrap();
        staged.file().write_all(b"new").unwrap();
        staged.commit_new().unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, expected);
    }
}
