//! Brief search over the in-memory list.
//!
//! # Responsibility
//! - Keep query/status matching pure and synchronous.

pub mod filter;
