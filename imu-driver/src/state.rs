//! Last-known sample shared between the decode loop and the health task

use std::sync::{Arc, Mutex, PoisonError};

use tamagawa::{StatusWord, Timestamp};

/// Status word and timestamp of the most recent record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub status: StatusWord,
    pub timestamp: Timestamp,
    /// Number of records seen so far, including this one
    pub sequence: u64,
}

/// Single-writer cell for the latest sample.
///
/// The decode loop is the only writer; the health task only reads. Status
/// and timestamp are stored together under one lock so a reader never sees
/// one updated without the other.
#[derive(Debug, Clone, Default)]
pub struct LatestSample {
    inner: Arc<Mutex<Option<Sample>>>,
}

impl LatestSample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the status word and timestamp of a newly decoded record
    pub fn record(&self, status: StatusWord, timestamp: Timestamp) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let sequence = guard.as_ref().map_or(1, |s| s.sequence + 1);
        *guard = Some(Sample {
            status,
            timestamp,
            sequence,
        });
    }

    /// Copy of the latest sample, if any record has been decoded
    pub fn snapshot(&self) -> Option<Sample> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
