//! Rendered events and the time window bounding a run

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, Result};

/// One rendered event: a prose sentence plus the sensitive substrings in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub body: String,
    pub tokens: Vec<String>,
}

impl Event {
    pub fn new(created_at: OffsetDateTime, body: String, tokens: Vec<String>) -> Self {
        Self {
            created_at,
            body,
            tokens,
        }
    }
}

/// Inclusive `[start, end]` range of event timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: OffsetDateTime,
    end: OffsetDateTime,
}

/// Where a timestamp falls relative to a [`TimeWindow`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Newer than `end`
    After,
    Within,
    /// Older than `start`
    Before,
}

impl TimeWindow {
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// The window ending at `end` and spanning `span` backwards
    pub fn ending_at(end: OffsetDateTime, span: time::Duration) -> Result<Self> {
        Self::new(end - span, end)
    }

    pub fn start(&self) -> OffsetDateTime {
        self.start
    }

    pub fn end(&self) -> OffsetDateTime {
        self.end
    }

    pub fn place(&self, at: OffsetDateTime) -> Placement {
        if at > self.end {
            Placement::After
        } else if at < self.start {
            Placement::Before
        } else {
            Placement::Within
        }
    }
}
