//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record handed out as read-only snapshots.
//! - Normalize and validate user-supplied fields before they reach storage.
//!
//! # Invariants
//! - `id` is stable and never reused for another task in the same process.
//! - `title` is never empty after trimming.
//! - `image` is either `None` or a non-blank opaque reference.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one task.
pub type TaskId = Uuid;

/// Validation errors for task input and state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Due date text is neither RFC 3339 nor `YYYY-MM-DD`.
    InvalidDueDate(String),
    /// Tasks must never use the nil UUID.
    NilId,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be blank"),
            Self::InvalidDueDate(value) => write!(
                f,
                "invalid due date `{value}`; expected RFC 3339 or YYYY-MM-DD"
            ),
            Self::NilId => write!(f, "task id must not be nil"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Opaque handle from the host image picker. Never interpreted by core.
    pub image: Option<String>,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
}

impl Task {
    /// Builds a new incomplete task with a generated ID.
    ///
    /// # Errors
    /// - `EmptyTitle` when `title` is blank after trimming.
    pub fn new(
        image: Option<String>,
        title: &str,
        description: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::new_v4(), image, title, description, due_date)
    }

    /// Builds a new incomplete task with a caller-provided ID.
    ///
    /// # Invariants
    /// - Title is stored trimmed.
    /// - Blank image references collapse to `None`.
    pub fn with_id(
        id: TaskId,
        image: Option<String>,
        title: &str,
        description: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        if id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        Ok(Self {
            id,
            image: normalize_image(image),
            title: normalize_title(title)?,
            description: description.into(),
            due_date,
            completed: false,
        })
    }

    /// Checks model invariants on an already-built record.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Trims a title and rejects it when nothing is left.
pub fn normalize_title(title: &str) -> Result<String, TaskValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Collapses blank image references to `None`.
///
/// Hosts pass an empty string when no picture was chosen.
pub fn normalize_image(image: Option<String>) -> Option<String> {
    image.filter(|value| !value.trim().is_empty())
}

/// Parses a due date coming from a host date picker.
///
/// Accepted forms:
/// - RFC 3339 timestamps, e.g. `2025-01-10T08:30:00.000Z`.
/// - Plain calendar dates, e.g. `2025-01-10`, read as midnight UTC.
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>, TaskValidationError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TaskValidationError::InvalidDueDate(trimmed.to_string()))
}
