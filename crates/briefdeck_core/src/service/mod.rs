//! Use-case services over the persistence layer.
//!
//! # Responsibility
//! - Keep the in-memory list consistent with storage.
//! - Keep UI collaborators decoupled from backend identity.

pub mod brief_list;
