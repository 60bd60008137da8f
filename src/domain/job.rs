//! Job domain types - the remote prediction job and its lifecycle.
//!
//! A [`Job`] is one remote asynchronous image-transformation task. The
//! client never mutates status locally; it only re-fetches it from the
//! service until a terminal state is reached.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a remote job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a remote job.
///
/// Anything the service reports that is not a recognized terminal state is
/// classified non-terminal and keeps the poll loop going. This tolerates
/// new intermediate statuses without a code change, but a new *terminal*
/// status would not be recognized until added here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    /// Accepted by the service, not yet started
    Queued,
    /// Actively generating
    Running,
    /// Finished with an output artifact
    Succeeded,
    /// Finished with an error
    Failed,
    /// Canceled server-side
    Canceled,
    /// Unrecognized status string, treated as still working
    Other(String),
}

impl JobStatus {
    /// Returns true if no further transitions can occur
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Canceled
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Canceled => "canceled",
            JobStatus::Other(s) => s,
        }
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        // "starting" and "processing" are the wire spellings used by
        // Replicate-style services for the queued/running phases.
        match s.as_str() {
            "queued" | "starting" => JobStatus::Queued,
            "running" | "processing" => JobStatus::Running,
            "succeeded" => JobStatus::Succeeded,
            "failed" => JobStatus::Failed,
            "canceled" => JobStatus::Canceled,
            _ => JobStatus::Other(s),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Job output as the service reports it: a single locator or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobOutput {
    Single(String),
    Many(Vec<String>),
}

impl JobOutput {
    /// First output element, if any. A single string is its own first
    /// element, so string and one-element array are equivalent.
    pub fn first(&self) -> Option<&str> {
        match self {
            JobOutput::Single(s) if !s.is_empty() => Some(s),
            JobOutput::Single(_) => None,
            JobOutput::Many(v) => v.first().map(String::as_str),
        }
    }
}

/// One snapshot of a remote job, as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub status: JobStatus,
    /// Present iff the job succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<JobOutput>,
    /// Present iff the job failed or was canceled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Locator for a produced output image - a URL or inline data URI.
///
/// Ownership passes to the caller, who is responsible for fetching or
/// rendering it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRef(String);

impl ArtifactRef {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
