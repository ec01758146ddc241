//! State container for the task list.
//!
//! # Responsibility
//! - Own the canonical item collection and its mutation API.
//! - Hand out immutable snapshots and notify subscribers on change.
//!
//! # Invariants
//! - The collection is only changed through `TaskStore` operations.
//! - The store is single-threaded; listeners run on the caller's thread.

pub mod snapshot;
pub mod task_store;
