//! Error types for retouch
//!
//! Centralized error handling using thiserror. Each variant maps to one
//! failure class of the submit/poll protocol; none are recovered
//! internally - they all propagate to the caller.

use thiserror::Error;

/// All error types that can occur in retouch
#[derive(Debug, Error)]
pub enum RetouchError {
    /// The job-creation call failed (transport-level or remote rejection)
    #[error("Submission failed: {0}")]
    Submission(String),

    /// A status check failed at the transport level, or the service
    /// returned a structurally invalid success payload
    #[error("Poll failed: {0}")]
    Poll(String),

    /// The job itself reached a terminal failure state server-side
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Polling exhausted its attempt budget without a terminal state
    #[error("Timed out after {attempts} status checks")]
    Timeout { attempts: u32 },

    /// The caller canceled polling before the job finished
    #[error("Canceled before completion")]
    Canceled,

    /// Request invariants violated (empty image or instruction)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No API token available in the configured environment variable
    #[error("API token not configured: set {0}")]
    MissingApiToken(String),
}

/// Result type alias for retouch operations
pub type Result<T> = std::result::Result<T, RetouchError>;
