//! Domain model for task items and their derived views.
//!
//! # Responsibility
//! - Define the canonical item record shared by store and persistence.
//! - Define the pure filters used to project list views.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Filters never carry state of their own.

pub mod filter;
pub mod item;
