//! Transport layer - the predictions service seam.
//!
//! This module provides:
//! - PredictionsApi trait for service abstraction
//! - ReplicateClient HTTP implementation
//! - MockPredictionsApi for deterministic tests

pub mod client;
pub mod replicate;

pub use client::{MockPredictionsApi, PredictionsApi};
pub use replicate::{ReplicateClient, ReplicateConfig};
