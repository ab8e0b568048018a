//! Local key-value persistence substrate.
//!
//! # Responsibility
//! - Provide durable string slots under fixed keys.
//! - Own the layout of local persisted state.
//!
//! # Invariants
//! - The brief collection lives under [`BRIEFS_KEY`] as one JSON array.
//! - The theme preference lives under [`THEME_KEY`] as a bare string.

pub mod kv_store;
pub mod preferences;

/// Key holding the JSON-serialized brief collection.
pub const BRIEFS_KEY: &str = "creative-briefs";
/// Key holding the `dark`/`light` theme preference.
pub const THEME_KEY: &str = "theme";
