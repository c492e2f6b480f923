//! Error types for trackify
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown card, invalid config)
//! - 3: Blocked by timer policy (another timer active, card stopped)
//! - 4: Operation failed (network, remote store, IO)

use thiserror::Error;

/// Exit codes for the trackify CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const POLICY_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for trackify operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Card not found: {0}")]
    CardNotFound(u64),

    // Policy blocks (exit code 3)
    #[error("Timer conflict: card {active} is already running, pause it before starting {requested}")]
    TimerConflict { requested: u64, active: u64 },

    #[error("Card {0} is stopped and can no longer change")]
    CardStopped(u64),

    // Operation failures (exit code 4)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote store answered {status} for {operation}")]
    RemoteStatus { operation: &'static str, status: u16 },

    #[error("Malformed response from remote store: {0}")]
    MalformedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::CardNotFound(_) => exit_codes::USER_ERROR,

            // Policy blocks
            Error::TimerConflict { .. } | Error::CardStopped(_) => exit_codes::POLICY_BLOCKED,

            // Operation failures
            Error::Http(_)
            | Error::RemoteStatus { .. }
            | Error::MalformedResponse(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON consumers, where an error carries any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TimerConflict { requested, active } => Some(serde_json::json!({
                "requested": requested,
                "active": active,
            })),
            Error::RemoteStatus { operation, status } => Some(serde_json::json!({
                "operation": operation,
                "status": status,
            })),
            _ => None,
        }
    }
}

/// Result type alias for trackify operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
