//! Domain types for image-edit jobs.

pub mod job;
pub mod request;

pub use job::{ArtifactRef, JobId, JobOutput, JobRecord, JobStatus};
pub use request::{EditParams, EditRequest};
