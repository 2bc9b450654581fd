//! Core domain logic for Duelist.
//! This crate is the single source of truth for task list invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{parse_due_date, Task, TaskId, TaskValidationError};
pub use repo::task_repo::{
    InMemoryTaskRepository, RepoError, RepoResult, TaskRecord, TaskRepository,
};
pub use service::task_store::{
    SortMode, StoreEvent, StoreResult, SubscriptionId, TaskDraft, TaskStore, TaskStoreError,
    TaskUpdate,
};
pub use view::card::TaskCard;
pub use view::ordinal::format_ordinal_date;
pub use view::urgency::{classify, classify_now, Urgency};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
