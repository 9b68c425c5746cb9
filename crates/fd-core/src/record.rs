//! Feedback records as stored by the document store.
//!
//! The dedup engine only reads `comment` and hands `id` back as the payload
//! of a match; the remaining fields are carried so records round-trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FdError, Result};

/// Feedback score: one of 1, 0, -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Score {
    Negative,
    Neutral,
    Positive,
}

impl TryFrom<i8> for Score {
    type Error = FdError;

    fn try_from(value: i8) -> Result<Self> {
        match value {
            -1 => Ok(Self::Negative),
            0 => Ok(Self::Neutral),
            1 => Ok(Self::Positive),
            other => Err(FdError::InvalidRecord(format!(
                "score must be -1, 0 or 1, got {other}"
            ))),
        }
    }
}

impl From<Score> for i8 {
    fn from(score: Score) -> Self {
        match score {
            Score::Negative => -1,
            Score::Neutral => 0,
            Score::Positive => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: String,
    pub score: Score,
    pub user_id: String,
    /// Client the feedback was submitted from (app id, `WEBSITE`, ...).
    pub from: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Parse one JSONL line.
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| FdError::InvalidRecord(e.to_string()))
    }
}
