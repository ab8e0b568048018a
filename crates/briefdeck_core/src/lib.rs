//! Core domain logic for BriefDeck, a creative-brief manager.
//! This crate owns brief persistence and list-state reconciliation; rendering
//! lives in callers.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;

pub use config::{AppConfig, ConfigError, StorageMode};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::brief::{Brief, BriefId, BriefInput, BriefStatus};
pub use repo::brief_repo::{open_brief_repository, BriefRepository, RepoError, RepoResult};
pub use repo::local_repo::LocalBriefRepository;
pub use repo::remote_repo::HttpBriefRepository;
pub use search::filter::{filter_briefs, BriefFilter, StatusCounts, StatusFilter};
pub use service::brief_list::{BriefListController, BriefListError, BriefListState, Notice};
pub use store::kv_store::{KeyValueStore, SqliteKeyValueStore, StoreError, StoreResult};
pub use store::preferences::{load_theme, save_theme, Theme};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
