//! Brief persistence: one contract, two interchangeable backends.
//!
//! # Responsibility
//! - Define the collection contract consumed by the list controller.
//! - Implement it over a remote HTTP resource and over the local store.
//!
//! # Invariants
//! - Callers observe the same signatures and return shapes for both
//!   backends; only the error kind tells them apart.

pub mod brief_repo;
pub mod local_repo;
pub mod remote_repo;
