//! Render-ready task card projection.
//!
//! # Responsibility
//! - Combine one task snapshot with read-time derived values for display.
//!
//! # Invariants
//! - Cards are rebuilt on every read; nothing here is cached on `Task`.

use crate::model::task::{Task, TaskId};
use crate::view::ordinal::format_ordinal_date;
use crate::view::urgency::{classify, Urgency};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// One row of the task list as the host UI draws it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCard {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub completed: bool,
    pub urgency: Urgency,
    /// Hex accent colour for the clock icon and due label.
    pub accent: &'static str,
    /// Due date label, e.g. `10th January`.
    pub due_label: String,
}

impl TaskCard {
    /// Builds a card for `task` as seen at `now`.
    ///
    /// Urgency is computed on UTC instants; the due label uses the calendar
    /// day in `tz`, so hosts should pass the user's display zone.
    pub fn from_task<Tz: TimeZone>(task: &Task, now: DateTime<Utc>, tz: &Tz) -> Self {
        let urgency = classify(task.due_date, now);
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            image: task.image.clone(),
            completed: task.completed,
            urgency,
            accent: urgency.colour(),
            due_label: format_ordinal_date(&task.due_date.with_timezone(tz)),
        }
    }
}
