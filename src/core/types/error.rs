//! Custom error types for winproc

use thiserror::Error;
use winapi::um::errhandlingapi::GetLastError;

use crate::windows::utils::errors::format_message;

/// Main error type for process and handle operations
#[derive(Error, Debug)]
pub enum ProcessError {
    /// A Windows API call reported failure through GetLastError
    #[error("{function} failed with error code {code}: {message}")]
    SystemCall {
        function: &'static str,
        code: u32,
        message: String,
    },

    /// An API that signals failure through its return value, with no
    /// GetLastError code to consult
    #[error("{function} returned unexpected value {value}")]
    UnexpectedReturn { function: &'static str, value: u32 },

    #[error("Malformed command line: {0}")]
    MalformedCommandLine(String),

    #[error("argv must contain at least one element")]
    EmptyArgv,

    #[error("Buffer of {size} bytes exceeds the 32-bit API limit")]
    BufferTooLarge { size: usize },

    #[error("WriteFile wrote only {actual} bytes instead of {expected}")]
    IncompleteWrite { expected: usize, actual: usize },

    #[error("Attempted to query the exit code of a running process")]
    StillRunning,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias for process and handle operations
pub type ProcessResult<T> = Result<T, ProcessError>;

impl ProcessError {
    /// Creates a system-call error from the calling thread's last error code
    pub fn system(function: &'static str) -> Self {
        let code = unsafe { GetLastError() };
        Self::with_code(function, code)
    }

    /// Creates a system-call error from an explicit error code
    pub fn with_code(function: &'static str, code: u32) -> Self {
        ProcessError::SystemCall {
            function,
            code,
            message: format_message(code),
        }
    }

    /// Creates an error for an API that failed with a non-standard return
    /// value rather than a last-error code
    pub fn custom(function: &'static str, value: u32) -> Self {
        ProcessError::UnexpectedReturn { function, value }
    }

    /// The OS error code carried by a system-call failure, if any
    pub fn os_code(&self) -> Option<u32> {
        match self {
            ProcessError::SystemCall { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_code_fields() {
        let err = ProcessError::with_code("CreatePipe", 5);
        match &err {
            ProcessError::SystemCall {
                function,
                code,
                message,
            } => {
                assert_eq!(*function, "CreatePipe");
                assert_eq!(*code, 5);
                assert!(!message.is_empty());
            }
            _ => panic!("Expected SystemCall error"),
        }
        assert_eq!(err.os_code(), Some(5));
    }

    #[test]
    fn test_custom_display() {
        let err = ProcessError::custom("WaitForSingleObject", 0x80);
        assert_eq!(
            err.to_string(),
            "WaitForSingleObject returned unexpected value 128"
        );
        assert_eq!(err.os_code(), None);
    }

    #[test]
    fn test_error_display() {
        let errors: Vec<(ProcessError, &str)> = vec![
            (
                ProcessError::MalformedCommandLine("empty string".to_string()),
                "Malformed command line: empty string",
            ),
            (
                ProcessError::EmptyArgv,
                "argv must contain at least one element",
            ),
            (
                ProcessError::BufferTooLarge {
                    size: 5_000_000_000,
                },
                "Buffer of 5000000000 bytes exceeds the 32-bit API limit",
            ),
            (
                ProcessError::IncompleteWrite {
                    expected: 100,
                    actual: 50,
                },
                "WriteFile wrote only 50 bytes instead of 100",
            ),
            (
                ProcessError::StillRunning,
                "Attempted to query the exit code of a running process",
            ),
        ];

        for (error, expected) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_from_implementations() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "test");
        let err: ProcessError = io_err.into();
        assert!(matches!(err, ProcessError::Io(_)));

        let utf8_err = String::from_utf8(vec![0xFF, 0xFE, 0xFD]).unwrap_err();
        let err: ProcessError = utf8_err.into();
        assert!(matches!(err, ProcessError::Utf8(_)));
    }

    #[test]
    fn test_process_result_type() {
        fn example_function() -> ProcessResult<u32> {
            Ok(42)
        }

        assert_eq!(example_function().unwrap(), 42);
    }
}
