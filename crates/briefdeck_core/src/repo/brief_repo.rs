//! Brief repository contract and backend selection.
//!
//! # Responsibility
//! - Define the five collection operations every backend implements.
//! - Classify failures into remote, storage, not-found and bad-data kinds.
//! - Build the backend selected by configuration.
//!
//! # Invariants
//! - Backends never recover errors locally; every failure propagates.
//! - Validity is advisory: no backend rejects a brief for an empty title.

use crate::config::{AppConfig, StorageMode};
use crate::model::brief::{Brief, BriefId, BriefInput};
use crate::repo::local_repo::LocalBriefRepository;
use crate::repo::remote_repo::HttpBriefRepository;
use crate::store::kv_store::{KeyValueStore, StoreError};
use async_trait::async_trait;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure shared by both backends.
#[derive(Debug)]
pub enum RepoError {
    /// Remote backend answered with a non-2xx status, or was unreachable
    /// (`status == None`).
    Remote {
        status: Option<u16>,
        message: String,
    },
    /// Local store could not be read or written.
    Storage(StoreError),
    /// Update targeted an id absent from the collection.
    NotFound(BriefId),
    /// Stored or received data could not be decoded into briefs.
    InvalidData(String),
}

impl RepoError {
    /// HTTP status of a remote failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => *status,
            _ => None,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote {
                status: Some(status),
                message,
            } => write!(f, "remote request failed with status {status}: {message}"),
            Self::Remote {
                status: None,
                message,
            } => write!(f, "remote backend unreachable: {message}"),
            Self::Storage(err) => write!(f, "local storage failed: {err}"),
            Self::NotFound(id) => write!(f, "brief not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid brief data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

/// CRUD contract over one logical brief collection.
///
/// Implementations are interchangeable: callers depend on this trait only,
/// never on backend identity.
#[async_trait]
pub trait BriefRepository: Send + Sync {
    /// Stores a new brief and returns it with its backend-assigned id.
    async fn create(&self, input: &BriefInput) -> RepoResult<Brief>;
    /// Returns the whole collection in backend order.
    async fn list_all(&self) -> RepoResult<Vec<Brief>>;
    /// Finds one brief. Local absence is `Ok(None)`.
    async fn get_by_id(&self, id: &BriefId) -> RepoResult<Option<Brief>>;
    /// Replaces one brief with a record rebuilt from `input` and `id`.
    async fn update(&self, id: &BriefId, input: &BriefInput) -> RepoResult<Brief>;
    /// Removes one brief. Returns `true` on success.
    async fn delete(&self, id: &BriefId) -> RepoResult<bool>;
}

#[async_trait]
impl<T: BriefRepository + ?Sized> BriefRepository for Box<T> {
    async fn create(&self, input: &BriefInput) -> RepoResult<Brief> {
        (**self).create(input).await
    }

    async fn list_all(&self) -> RepoResult<Vec<Brief>> {
        (**self).list_all().await
    }

    async fn get_by_id(&self, id: &BriefId) -> RepoResult<Option<Brief>> {
        (**self).get_by_id(id).await
    }

    async fn update(&self, id: &BriefId, input: &BriefInput) -> RepoResult<Brief> {
        (**self).update(id, input).await
    }

    async fn delete(&self, id: &BriefId) -> RepoResult<bool> {
        (**self).delete(id).await
    }
}

/// Builds the backend chosen by `config.storage_mode`.
///
/// `store` is only used in local mode; remote mode talks to
/// `config.api_base_url`.
pub fn open_brief_repository(
    config: &AppConfig,
    store: Arc<dyn KeyValueStore>,
) -> RepoResult<Box<dyn BriefRepository>> {
    info!(
        "event=repo_open module=repo status=ok backend={}",
        config.storage_mode.as_str()
    );
    match config.storage_mode {
        StorageMode::Remote => Ok(Box::new(HttpBriefRepository::new(
            &config.api_base_url,
            config.request_timeout,
        )?)),
        StorageMode::Local => Ok(Box::new(LocalBriefRepository::new(store))),
    }
}
