//! Top-level error type and process exit codes.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,

    /// Invalid configuration (zero interval or running time).
    InvalidInput = 30,

    /// Internal/runtime error (unwritable outfile, serialization failures).
    RuntimeError = 40,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Errors that end the process with a non-zero status.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("invalid configuration: {0:#}")]
    InvalidInput(anyhow::Error),
    #[error("{0:#}")]
    RuntimeError(anyhow::Error),
}

impl RunError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidInput(_) => ExitCode::InvalidInput,
            Self::RuntimeError(_) => ExitCode::RuntimeError,
        }
    }
}
