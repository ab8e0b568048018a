//! Domain model for creative briefs.
//!
//! # Responsibility
//! - Define the record shape shared by every storage backend.
//! - Keep validity a pure query over the record.
//!
//! # Invariants
//! - Records are value objects: updates replace a record, never patch it.

pub mod brief;
