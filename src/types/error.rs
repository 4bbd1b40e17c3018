use anyhow::Error;
use thiserror::Error;

/// Application-level error types for s3sweep.
///
/// Remote S3 failures travel as `anyhow::Error` with context attached by the
/// storage layer; these variants cover the conditions the pipeline itself
/// detects.
///
/// ## Exit Codes
///
/// - 1: General errors (MissingContinuationToken, remote failures)
/// - 2: Configuration errors (InvalidConfig)
#[derive(Error, Debug, PartialEq)]
pub enum S3SweepError {
    /// Configuration error, raised before any network call.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// ListObjectsV2 reported more pages but returned no continuation token.
    #[error("ListObjectsV2 response is truncated but has no continuation token")]
    MissingContinuationToken,
}

impl S3SweepError {
    pub fn exit_code(&self) -> i32 {
        match self {
            S3SweepError::InvalidConfig(_) => 2,
            _ => 1,
        }
    }
}

/// Extract the exit code from an anyhow::Error, defaulting to 1.
pub fn exit_code_from_error(e: &Error) -> i32 {
    if let Some(err) = e.downcast_ref::<S3SweepError>() {
        return err.exit_code();
    }
    1
}
