//! Archive-relative path strings.
//!
//! Entry names inside a container always use `/` separators. A name that ends
//! in `/` is a directory entry; everything else is a file. The free functions
//! in this module operate on raw `&str` names and never fail. [`ArchivePath`]
//! is the validated form used wherever a name crosses from the outside world
//! into the store.

use crate::{Error, Result};
use std::fmt;

/// Maximum length for entry names (in bytes).
///
/// The ZIP local header stores the name length in 16 bits.
const MAX_PATH_LENGTH: usize = u16::MAX as usize;

/// Returns `true` if `path` names a directory entry.
///
/// # Examples
///
/// ```
/// use tiwut::archive_path::is_directory;
///
/// assert!(is_directory("data/"));
/// assert!(!is_directory("data/notes.txt"));
/// ```
#[inline]
pub fn is_directory(path: &str) -> bool {
    path.ends_with('/')
}

/// Strips a single trailing `/`.
///
/// Stored names are never modified; this is only used to compute derived
/// paths.
#[inline]
pub fn normalize(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Returns the directory that contains `path`, with a trailing `/`.
///
/// Returns the empty string (the container root) for top-level items.
///
/// # Examples
///
/// ```
/// use tiwut::archive_path::parent_directory;
///
/// assert_eq!(parent_directory("data/sub/file.txt"), "data/sub/");
/// assert_eq!(parent_directory("data/file.txt"), "data/");
/// assert_eq!(parent_directory("data/sub/"), "data/");
/// assert_eq!(parent_directory("readme.txt"), "");
/// ```
pub fn parent_directory(path: &str) -> &str {
    let normalized = normalize(path);
    match normalized.rfind('/') {
        Some(idx) => &normalized[..=idx],
        None => "",
    }
}

/// Splits a name into its segments, ignoring a trailing `/`.
///
/// `"data/sub/"` yields `["data", "sub"]`.
pub fn split_segments(path: &str) -> Vec<&str> {
    let normalized = normalize(path);
    if normalized.is_empty() {
        return Vec::new();
    }
    normalized.split('/').collect()
}

/// Returns the last segment of a name, without any trailing `/`.
pub fn file_name(path: &str) -> &str {
    let normalized = normalize(path);
    normalized.rsplit('/').next().unwrap_or(normalized)
}

/// Joins a directory (with or without trailing `/`) and a child name.
///
/// An empty directory means the container root.
pub fn join(directory: &str, name: &str) -> String {
    if directory.is_empty() {
        name.to_string()
    } else if is_directory(directory) {
        format!("{}{}", directory, name)
    } else {
        format!("{}/{}", directory, name)
    }
}

/// A validated entry name.
///
/// `ArchivePath` accepts file names (`data/a.txt`) and directory names
/// (`data/`) and rejects anything that could escape the container root or
/// produce an ambiguous entry:
/// - empty names and NUL bytes
/// - absolute names (leading `/`) and backslashes
/// - empty segments (`a//b`)
/// - `.` and `..` segments
///
/// # Examples
///
/// ```
/// use tiwut::ArchivePath;
///
/// let path = ArchivePath::new("data/sub/").unwrap();
/// assert!(path.is_directory());
/// assert_eq!(path.file_name(), "sub");
///
/// assert!(ArchivePath::new("../secret").is_err());
/// assert!(ArchivePath::new("/absolute").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchivePath(String);

impl ArchivePath {
    /// Creates a new `ArchivePath`, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEntry`] if the name is not a safe,
    /// container-relative entry name.
    pub fn new(s: &str) -> Result<Self> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }

    fn validate(s: &str) -> Result<()> {
        if s.is_empty() {
            return Err(Error::malformed("empty name"));
        }
        if s.contains('\0') {
            return Err(Error::malformed(format!("{:?}: contains NUL byte", s)));
        }
        if s.len() > MAX_PATH_LENGTH {
            return Err(Error::malformed(format!(
                "name exceeds maximum length of {} bytes",
                MAX_PATH_LENGTH
            )));
        }
        if s.starts_with('/') {
            return Err(Error::malformed(format!("{:?}: absolute name", s)));
        }
        if s.contains('\\') {
            return Err(Error::malformed(format!("{:?}: backslash separator", s)));
        }

        for segment in normalize(s).split('/') {
            match segment {
                "" => {
                    return Err(Error::malformed(format!(
                        "{:?}: empty segment (consecutive slashes)",
                        s
                    )));
                }
                "." | ".." => {
                    return Err(Error::malformed(format!(
                        "{:?}: '{}' segment not allowed",
                        s, segment
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this names a directory entry.
    #[inline]
    pub fn is_directory(&self) -> bool {
        is_directory(&self.0)
    }

    /// Returns the containing directory (see [`parent_directory`]).
    pub fn parent_directory(&self) -> &str {
        parent_directory(&self.0)
    }

    /// Returns the last segment.
    pub fn file_name(&self) -> &str {
        file_name(&self.0)
    }

    /// Returns the segments of this name.
    pub fn segments(&self) -> Vec<&str> {
        split_segments(&self.0)
    }

    /// Consumes the path and returns the owned name.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ArchivePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for ArchivePath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ArchivePath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_directory() {
        assert!(is_directory("data/"));
        assert!(is_directory("data/sub/"));
        assert!(!is_directory("data"));
        assert!(!is_directory("data/a.txt"));
    }

    #[test]
    fn test_normalize_strips_one_slash() {
        assert_eq!(normalize("data/"), "data");
        assert_eq!(normalize("data/a.txt"), "data/a.txt");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_parent_directory() {
        assert_eq!(parent_directory("data/sub/file.txt"), "data/sub/");
        assert_eq!(parent_directory("data/file.txt"), "data/");
        assert_eq!(parent_directory("file.txt"), "");
        assert_eq!(parent_directory("data/"), "");
        assert_eq!(parent_directory("data/sub/"), "data/");
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments("data/sub/"), vec!["data", "sub"]);
        assert_eq!(split_segments("data/sub/b.txt"), vec!["data", "sub", "b.txt"]);
        assert_eq!(split_segments("top"), vec!["top"]);
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("data/sub/b.txt"), "b.txt");
        assert_eq!(file_name("data/sub/"), "sub");
        assert_eq!(file_name("top"), "top");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("data/", "a.txt"), "data/a.txt");
        assert_eq!(join("data", "a.txt"), "data/a.txt");
        assert_eq!(join("", "a.txt"), "a.txt");
    }

    #[test]
    fn test_valid_file_and_directory() {
        let file = ArchivePath::new("data/notes.txt").unwrap();
        assert!(!file.is_directory());
        assert_eq!(file.parent_directory(), "data/");

        let dir = ArchivePath::new("data/").unwrap();
        assert!(dir.is_directory());
        assert_eq!(dir.segments(), vec!["data"]);
    }

    #[test]
    fn test_valid_unicode() {
        let path = ArchivePath::new("日本語/файл.txt").unwrap();
        assert_eq!(path.file_name(), "файл.txt");
    }

    #[test]
    fn test_valid_dots_inside_names() {
        assert!(ArchivePath::new("data/..hidden").is_ok());
        assert!(ArchivePath::new("data/a..b").is_ok());
        assert!(ArchivePath::new(".gitignore").is_ok());
    }

    #[test]
    fn test_invalid_empty() {
        let err = ArchivePath::new("").unwrap_err();
        assert!(matches!(err, Error::MalformedEntry(_)));
    }

    #[test]
    fn test_invalid_absolute() {
        assert!(matches!(
            ArchivePath::new("/etc/passwd"),
            Err(Error::MalformedEntry(_))
        ));
    }

    #[test]
    fn test_invalid_traversal() {
        assert!(ArchivePath::new("..").is_err());
        assert!(ArchivePath::new("data/../x").is_err());
        assert!(ArchivePath::new("data/../").is_err());
        assert!(ArchivePath::new("./x").is_err());
    }

    #[test]
    fn test_invalid_empty_segment() {
        assert!(ArchivePath::new("data//x").is_err());
        assert!(ArchivePath::new("data//").is_err());
        assert!(ArchivePath::new("/").is_err());
    }

    #[test]
    fn test_invalid_nul_and_backslash() {
        assert!(ArchivePath::new("a\0b").is_err());
        assert!(ArchivePath::new("data\\x.txt").is_err());
    }

    #[test]
    fn test_invalid_too_long() {
        let long = "a".repeat(MAX_PATH_LENGTH + 1);
        let err = ArchivePath::new(&long).unwrap_err();
        assert!(err.to_string().contains("maximum length"));
    }

    #[test]
    fn test_try_from_and_display() {
        let path: ArchivePath = "meta/created_at.txt".try_into().unwrap();
        assert_eq!(path.to_string(), "meta/created_at.txt");
        let owned = ArchivePath::try_from(String::from("temp/")).unwrap();
        assert_eq!(owned.into_string(), "temp/");
    }
}
