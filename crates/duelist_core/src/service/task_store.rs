//! Task store use-case service.
//!
//! # Responsibility
//! - Provide create/update/delete/complete entry points for host UIs.
//! - Produce the list the UI should render, honoring the active sort mode.
//! - Notify subscribers after every successful state change.
//!
//! # Invariants
//! - Mutations only ever touch canonical repository storage.
//! - The due-date ordering is a full recomputation over canonical storage,
//!   refreshed after each mutation; it is never patched in place.
//! - Due-date ties are broken by insertion sequence.
//! - A failed call mutates nothing and notifies nobody.

use crate::model::task::{normalize_image, normalize_title, Task, TaskId, TaskValidationError};
use crate::repo::task_repo::{InMemoryTaskRepository, RepoError, TaskRecord, TaskRepository};
use crate::view::card::TaskCard;
use chrono::{DateTime, Local, TimeZone, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Ordering exposed by `TaskStore::view`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Task creation order.
    #[default]
    Insertion,
    /// Ascending due date, ties in creation order.
    DueDate,
}

impl SortMode {
    fn from_active(active: bool) -> Self {
        if active {
            Self::DueDate
        } else {
            Self::Insertion
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Insertion => "insertion",
            Self::DueDate => "due_date",
        }
    }
}

/// Errors from task store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStoreError {
    /// Input failed model validation (blank title, bad date).
    Validation(TaskValidationError),
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for TaskStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::TaskNotFound(_) => None,
        }
    }
}

impl From<TaskValidationError> for TaskStoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TaskStoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type StoreResult<T> = Result<T, TaskStoreError>;

/// Input for creating one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub image: Option<String>,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
}

/// Replacement values for an edit.
///
/// `image: None` keeps the current picture; `Some` replaces it, and a blank
/// string clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub image: Option<String>,
}

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Created(TaskId),
    Updated(TaskId),
    Deleted(TaskId),
    CompletionToggled { id: TaskId, completed: bool },
    SortModeChanged(SortMode),
}

/// Handle returned by `TaskStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Session-scoped owner of the task collection.
pub struct TaskStore<R: TaskRepository> {
    repo: R,
    sort_mode: SortMode,
    /// Present only while `sort_mode == DueDate`.
    due_order: Option<Vec<TaskId>>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl TaskStore<InMemoryTaskRepository> {
    /// Creates an empty store backed by process-local storage.
    pub fn in_memory() -> Self {
        Self::new(InMemoryTaskRepository::new())
    }
}

impl<R: TaskRepository> TaskStore<R> {
    /// Creates a store in insertion-order mode.
    pub fn new(repo: R) -> Self {
        Self::with_sort_mode(repo, SortMode::Insertion)
    }

    /// Creates a store starting in `sort_mode`.
    pub fn with_sort_mode(repo: R, sort_mode: SortMode) -> Self {
        let mut store = Self {
            repo,
            sort_mode,
            due_order: None,
            listeners: Vec::new(),
            next_subscription: 0,
        };
        store.refresh_projection();
        store
    }

    /// Creates one task with `completed = false`.
    ///
    /// # Errors
    /// - `Validation(EmptyTitle)` when the trimmed title is empty.
    pub fn create(&mut self, draft: TaskDraft) -> StoreResult<Task> {
        let id = self.fresh_id();
        let task = Task::with_id(
            id,
            draft.image,
            &draft.title,
            draft.description,
            draft.due_date,
        )
        .inspect_err(|err| {
            warn!("event=task_create module=store status=rejected reason={err}");
        })?;

        let record = self.repo.insert_task(task)?;
        self.refresh_projection();
        info!(
            "event=task_create module=store status=ok task_id={} count={}",
            id,
            self.len()
        );
        self.notify(StoreEvent::Created(id));
        Ok(record.task)
    }

    /// Replaces title, description and due date of an existing task.
    ///
    /// Completion state is preserved.
    ///
    /// # Errors
    /// - `TaskNotFound` when `id` is unknown.
    /// - `Validation(EmptyTitle)` when the trimmed title is empty.
    pub fn update(&mut self, id: TaskId, changes: TaskUpdate) -> StoreResult<Task> {
        let mut task = self
            .repo
            .get_task(id)
            .map(|record| record.task)
            .ok_or(TaskStoreError::TaskNotFound(id))
            .inspect_err(|_| {
                warn!("event=task_update module=store status=not_found task_id={id}");
            })?;

        task.title = normalize_title(&changes.title).inspect_err(|err| {
            warn!("event=task_update module=store status=rejected task_id={id} reason={err}");
        })?;
        task.description = changes.description;
        task.due_date = changes.due_date;
        if let Some(image) = changes.image {
            task.image = normalize_image(Some(image));
        }

        let record = self.repo.replace_task(task)?;
        self.refresh_projection();
        info!("event=task_update module=store status=ok task_id={id}");
        self.notify(StoreEvent::Updated(id));
        Ok(record.task)
    }

    /// Removes one task and returns its last snapshot.
    ///
    /// # Errors
    /// - `TaskNotFound` when `id` is unknown, including a repeated delete.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<Task> {
        let record = self.repo.remove_task(id).inspect_err(|_| {
            warn!("event=task_delete module=store status=not_found task_id={id}");
        })?;
        self.refresh_projection();
        info!(
            "event=task_delete module=store status=ok task_id={} count={}",
            id,
            self.len()
        );
        self.notify(StoreEvent::Deleted(id));
        Ok(record.task)
    }

    /// Flips the completion flag. Ordering is unaffected.
    ///
    /// # Errors
    /// - `TaskNotFound` when `id` is unknown.
    pub fn toggle_complete(&mut self, id: TaskId) -> StoreResult<Task> {
        let mut task = self
            .repo
            .get_task(id)
            .map(|record| record.task)
            .ok_or(TaskStoreError::TaskNotFound(id))
            .inspect_err(|_| {
                warn!("event=task_toggle module=store status=not_found task_id={id}");
            })?;
        task.completed = !task.completed;
        let completed = task.completed;

        let record = self.repo.replace_task(task)?;
        self.refresh_projection();
        debug!("event=task_toggle module=store status=ok task_id={id} completed={completed}");
        self.notify(StoreEvent::CompletionToggled { id, completed });
        Ok(record.task)
    }

    /// Switches between due-date and insertion order and returns the new view.
    ///
    /// Activating always recomputes the ordering from canonical storage.
    pub fn set_sort_mode(&mut self, active: bool) -> Vec<Task> {
        let next = SortMode::from_active(active);
        let changed = next != self.sort_mode;
        self.sort_mode = next;
        self.refresh_projection();

        if changed {
            debug!(
                "event=sort_mode module=store status=ok mode={}",
                next.as_str()
            );
            self.notify(StoreEvent::SortModeChanged(next));
        }
        self.view()
    }

    /// Flips the sort mode, like tapping the "sort by date" toggle.
    pub fn toggle_sort_mode(&mut self) -> Vec<Task> {
        let active = !self.is_sorted();
        self.set_sort_mode(active)
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn is_sorted(&self) -> bool {
        self.sort_mode == SortMode::DueDate
    }

    /// Snapshot of the active ordering.
    pub fn view(&self) -> Vec<Task> {
        let records = self.repo.list_tasks();
        let Some(order) = &self.due_order else {
            return records.into_iter().map(|record| record.task).collect();
        };

        let mut by_id: HashMap<TaskId, Task> = records
            .into_iter()
            .map(|record| (record.task.id, record.task))
            .collect();
        order.iter().filter_map(|id| by_id.remove(id)).collect()
    }

    /// Active view decorated with urgency as of `now` and due labels in the
    /// calendar of `tz`.
    pub fn cards<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> Vec<TaskCard> {
        self.view()
            .iter()
            .map(|task| TaskCard::from_task(task, now, tz))
            .collect()
    }

    /// Same as `cards`, evaluated against the wall clock in local time.
    pub fn cards_now(&self) -> Vec<TaskCard> {
        self.cards(Utc::now(), &Local)
    }

    /// Gets one task snapshot by ID.
    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.repo.get_task(id).map(|record| record.task)
    }

    pub fn len(&self) -> usize {
        self.repo.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a listener called after each successful state change.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn fresh_id(&self) -> TaskId {
        loop {
            let id = Uuid::new_v4();
            if !self.repo.is_id_used(id) {
                return id;
            }
        }
    }

    fn refresh_projection(&mut self) {
        self.due_order = match self.sort_mode {
            SortMode::Insertion => None,
            SortMode::DueDate => Some(due_date_order(&self.repo.list_tasks())),
        };
    }

    fn notify(&mut self, event: StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

/// Orders records by ascending due date, then by insertion sequence.
pub fn due_date_order(records: &[TaskRecord]) -> Vec<TaskId> {
    let mut keyed: Vec<_> = records
        .iter()
        .map(|record| (record.task.due_date, record.seq, record.task.id))
        .collect();
    keyed.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    keyed.into_iter().map(|(_, _, id)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::due_date_order;
    use crate::model::task::Task;
    use crate::repo::task_repo::TaskRecord;
    use chrono::{TimeZone, Utc};

    fn record(seq: u64, title: &str, day: u32) -> TaskRecord {
        let due = Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap();
        TaskRecord {
            seq,
            task: Task::new(None, title, "", due).unwrap(),
        }
    }

    #[test]
    fn due_date_order_breaks_ties_by_sequence_even_when_input_is_shuffled() {
        let a = record(0, "a", 3);
        let b = record(1, "b", 3);
        let c = record(2, "c", 1);
        let d = record(3, "d", 3);

        let order = due_date_order(&[d.clone(), b.clone(), c.clone(), a.clone()]);
        assert_eq!(order, vec![c.task.id, a.task.id, b.task.id, d.task.id]);
    }
}
