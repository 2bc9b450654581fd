//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical task record shared by store and view projections.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Derived values (urgency, display order) are never stored on the record.

pub mod task;
