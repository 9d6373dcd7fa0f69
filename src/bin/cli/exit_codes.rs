//! Exit codes for the CLI tool.

use tiwut::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Container is not a readable archive
pub const BAD_ARCHIVE: i32 = 3;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Entry missing, or already present
pub const ENTRY_ERROR: i32 = 6;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    FatalError,
    BadArchive,
    IoError,
    EntryError,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::FatalError => FATAL_ERROR,
            Self::BadArchive => BAD_ARCHIVE,
            Self::IoError => IO_ERROR,
            Self::EntryError => ENTRY_ERROR,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a tiwut error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) | Error::AlreadyExists { .. } => ExitCode::IoError,
        Error::CorruptArchive(_) => ExitCode::BadArchive,
        Error::EntryNotFound { .. } | Error::DuplicateEntry { .. } => ExitCode::EntryError,
        Error::MalformedEntry(_) | Error::NotEditable { .. } => ExitCode::BadArgs,
        Error::NoContainerOpen => ExitCode::FatalError,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let io = Error::Io(std::io::Error::other("disk"));
        assert_eq!(error_to_exit_code(&io), ExitCode::IoError);
        assert_eq!(
            error_to_exit_code(&Error::CorruptArchive("bad".into())),
            ExitCode::BadArchive
        );
        assert_eq!(
            error_to_exit_code(&Error::entry_not_found("data/x")),
            ExitCode::EntryError
        );
        assert_eq!(
            error_to_exit_code(&Error::malformed("../x")),
            ExitCode::BadArgs
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::EntryError.code(), 6);
        assert_eq!(ExitCode::BadArgs.code(), 255);
    }
}
