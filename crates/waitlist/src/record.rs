//! Fallback records kept when the collector rejects a submission.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::SubmissionDraft;

/// A submission that the collector rejected and that was captured locally.
///
/// Serialized with the field names `name`, `email`, `pain`, `timestamp` and
/// `fallback`. Older logs used `ts` for the timestamp; it is still accepted
/// when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackRecord {
    /// The person's name.
    pub name: String,
    /// Their work email.
    pub email: String,
    /// Their biggest admin headache.
    pub pain: String,
    /// When the record was captured, in epoch milliseconds.
    #[serde(alias = "ts")]
    pub timestamp: i64,
    /// Always `true` for records written by the submitter.
    #[serde(default = "default_fallback")]
    pub fallback: bool,
}

fn default_fallback() -> bool {
    true
}

impl FallbackRecord {
    /// Capture a draft with the current time.
    #[must_use]
    pub fn capture(draft: &SubmissionDraft) -> Self {
        Self::capture_at(draft, Utc::now().timestamp_millis())
    }

    /// Capture a draft with an explicit timestamp.
    #[must_use]
    pub fn capture_at(draft: &SubmissionDraft, timestamp: i64) -> Self {
        Self {
            name: draft.name.clone(),
            email: draft.email.clone(),
            pain: draft.pain.clone(),
            timestamp,
            fallback: true,
        }
    }

    /// The capture time as a UTC datetime, if the millis are in range.
    #[must_use]
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}
