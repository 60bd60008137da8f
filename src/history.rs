//! Bounded in-memory history of completed edits.
//!
//! Newest-first, capacity-limited. Nothing is persisted; this only backs a
//! "previous edits" view in the consuming UI.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ArtifactRef;

/// One completed edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    pub instruction: String,
    pub artifact: ArtifactRef,
    pub completed_at: DateTime<Utc>,
}

/// Ring of the most recent edits, newest first.
#[derive(Debug, Clone)]
pub struct EditHistory {
    entries: VecDeque<EditRecord>,
    capacity: usize,
}

impl EditHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a completed edit, evicting the oldest entry if full.
    pub fn record(&mut self, instruction: impl Into<String>, artifact: ArtifactRef) {
        self.entries.push_front(EditRecord {
            instruction: instruction.into(),
            artifact,
            completed_at: Utc::now(),
        });
        self.entries.truncate(self.capacity);
    }

    /// Entries newest first.
    pub fn recent(&self) -> Vec<EditRecord> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
