//! Time-relative urgency buckets for task due dates.
//!
//! # Invariants
//! - Urgency is derived at read time and never stored on `Task`.
//! - Dates more than one day in the past fall into `Normal`; there is no
//!   overdue bucket.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Three-level urgency used to pick a card accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Due within one day either side of now.
    Critical,
    /// Due between one and seven days from now.
    Soon,
    Normal,
}

impl Urgency {
    /// Numeric level, 1 being most urgent.
    pub fn level(self) -> u8 {
        match self {
            Self::Critical => 1,
            Self::Soon => 2,
            Self::Normal => 3,
        }
    }

    /// Card accent colour as a hex string.
    pub fn colour(self) -> &'static str {
        match self {
            Self::Critical => "#E95A4A",
            Self::Soon => "#E6C15A",
            Self::Normal => "#7ADEA0",
        }
    }
}

/// Classifies `due_date` relative to `now`.
///
/// - `Critical`: `-1 day < due - now < 1 day`.
/// - `Soon`: `1 day <= due - now < 7 days`.
/// - `Normal`: everything else.
///
/// A task overdue by a full day or more is `Normal`, not `Critical`; a plain
/// `due - now < 1 day` check would mark every overdue task `Critical`.
pub fn classify(due_date: DateTime<Utc>, now: DateTime<Utc>) -> Urgency {
    let remaining = due_date - now;
    let one_day = Duration::days(1);

    if remaining > -one_day && remaining < one_day {
        Urgency::Critical
    } else if remaining >= one_day && remaining < Duration::days(7) {
        Urgency::Soon
    } else {
        Urgency::Normal
    }
}

/// Classifies `due_date` against the current wall clock.
pub fn classify_now(due_date: DateTime<Utc>) -> Urgency {
    classify(due_date, Utc::now())
}
