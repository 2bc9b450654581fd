//! Repository layer abstractions and storage implementations.
//!
//! # Responsibility
//! - Define the canonical task storage contract used by the store service.
//! - Keep storage details out of ordering and presentation logic.
//!
//! # Invariants
//! - Repository writes must enforce `Task::validate()` before mutation.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`).

pub mod task_repo;
