use thiserror::Error;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Empty command line")]
    EmptyCommand,

    #[error("{tool} not found")]
    ToolMissing { tool: String },

    #[error("`{command}` failed with exit code {code}: {stderr}")]
    ToolFailed {
        command: String,
        code: i32,
        stderr: String,
        stdout: String,
    },

    #[error("`{command}` timed out after {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error("Unsupported platform: {arch}")]
    PlatformUnsupported { arch: String },

    #[error("Missing dependency: {0}")]
    DependencyMissing(String),

    #[error("Failed to pull model {model}: {reason}")]
    PullFailed { model: String, reason: String },
}

impl Error {
    /// Stderr captured from the failing child, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Error::ToolFailed { stderr, .. } if !stderr.trim().is_empty() => Some(stderr),
            _ => None,
        }
    }

    /// Stdout captured from the failing child, if any.
    pub fn stdout(&self) -> Option<&str> {
        match self {
            Error::ToolFailed { stdout, .. } if !stdout.trim().is_empty() => Some(stdout),
            _ => None,
        }
    }
}
