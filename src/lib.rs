//! retouch - async client for instruction-driven image editing
//!
//! retouch submits an image-edit job to a remote prediction service and
//! polls its status until the job reaches a terminal state, returning a
//! reference to the produced artifact or a well-defined failure.

pub mod api;
pub mod config;
pub mod domain;
pub mod editor;
pub mod error;
pub mod history;
pub mod models;
pub mod poller;
pub mod submitter;

pub use error::{Result, RetouchError};
