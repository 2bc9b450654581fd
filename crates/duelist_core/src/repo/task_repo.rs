//! Task repository contracts and in-memory implementation.
//!
//! # Responsibility
//! - Own canonical task storage in insertion order.
//! - Assign each record a monotonic insertion sequence used for tie-breaks.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before mutating storage.
//! - At most one record per `TaskId`; retired IDs are never accepted again.
//! - A failed call leaves storage untouched.

use crate::model::task::{Task, TaskId, TaskValidationError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Validation(TaskValidationError),
    NotFound(TaskId),
    /// ID is live or was used by a task deleted earlier in this process.
    DuplicateId(TaskId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::DuplicateId(id) => write!(f, "task id already used: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// One stored task plus its insertion sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// Strictly increasing across inserts; never reassigned on update.
    pub seq: u64,
    pub task: Task,
}

/// Repository interface for canonical task storage.
pub trait TaskRepository {
    fn insert_task(&mut self, task: Task) -> RepoResult<TaskRecord>;
    fn replace_task(&mut self, task: Task) -> RepoResult<TaskRecord>;
    fn remove_task(&mut self, id: TaskId) -> RepoResult<TaskRecord>;
    fn get_task(&self, id: TaskId) -> Option<TaskRecord>;
    /// Returns all records in insertion order.
    fn list_tasks(&self) -> Vec<TaskRecord>;
    fn count(&self) -> usize;
    /// Returns whether `id` was ever issued, live or retired.
    fn is_id_used(&self, id: TaskId) -> bool;
}

/// Process-local task repository backed by a `Vec`.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    records: Vec<TaskRecord>,
    used_ids: HashSet<TaskId>,
    next_seq: u64,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.records.iter().position(|record| record.task.id == id)
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn insert_task(&mut self, task: Task) -> RepoResult<TaskRecord> {
        task.validate()?;
        if self.used_ids.contains(&task.id) {
            return Err(RepoError::DuplicateId(task.id));
        }

        let record = TaskRecord {
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        self.used_ids.insert(record.task.id);
        self.records.push(record.clone());
        Ok(record)
    }

    fn replace_task(&mut self, task: Task) -> RepoResult<TaskRecord> {
        task.validate()?;
        let index = self.position(task.id).ok_or(RepoError::NotFound(task.id))?;

        let record = &mut self.records[index];
        record.task = task;
        Ok(record.clone())
    }

    fn remove_task(&mut self, id: TaskId) -> RepoResult<TaskRecord> {
        let index = self.position(id).ok_or(RepoError::NotFound(id))?;
        // `Vec::remove` keeps the remaining records in insertion order.
        Ok(self.records.remove(index))
    }

    fn get_task(&self, id: TaskId) -> Option<TaskRecord> {
        self.position(id).map(|index| self.records[index].clone())
    }

    fn list_tasks(&self) -> Vec<TaskRecord> {
        self.records.clone()
    }

    fn count(&self) -> usize {
        self.records.len()
    }

    fn is_id_used(&self, id: TaskId) -> bool {
        self.used_ids.contains(&id)
    }
}
