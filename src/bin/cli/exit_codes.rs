//! Exit codes for the CLI tool.

use lovepatch::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Archive format error
pub const BAD_ARCHIVE: i32 = 3;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    FatalError,
    BadArchive,
    IoError,
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
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a lovepatch error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) => ExitCode::IoError,
        Error::InvalidArchive(_) | Error::CorruptEntry { .. } => ExitCode::BadArchive,
        Error::WriteFailed { .. } => ExitCode::FatalError,
        Error::ResourceLimitExceeded(_) => ExitCode::FatalError,
        Error::InvalidArchivePath(_) => ExitCode::FatalError,
        Error::InvalidInputPath(_) | Error::InvalidCompressionLevel { .. } => ExitCode::BadArgs,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::FatalError.code(), 2);
        assert_eq!(ExitCode::BadArchive.code(), 3);
        assert_eq!(ExitCode::IoError.code(), 5);
        assert_eq!(ExitCode::BadArgs.code(), 255);
    }

    #[test]
    fn test_error_mapping() {
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "x"));
        assert_eq!(error_to_exit_code(&io), ExitCode::IoError);
        assert_eq!(
            error_to_exit_code(&Error::InvalidArchive("eocd".into())),
            ExitCode::BadArchive
        );
        assert_eq!(
            error_to_exit_code(&Error::write_failed("main.lua", "boom")),
            ExitCode::FatalError
        );
        assert_eq!(
            error_to_exit_code(&Error::InvalidInputPath("/".into())),
            ExitCode::BadArgs
        );
    }
}
