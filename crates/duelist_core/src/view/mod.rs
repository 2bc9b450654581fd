//! Read-time projections for presentation layers.
//!
//! # Responsibility
//! - Derive time-dependent values (urgency, date labels) from task snapshots.
//!
//! # Invariants
//! - Every function here is pure given its inputs; the wall clock is only
//!   read by the explicit `*_now` helpers.

pub mod card;
pub mod ordinal;
pub mod urgency;
