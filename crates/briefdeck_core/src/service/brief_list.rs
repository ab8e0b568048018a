//! Brief list controller.
//!
//! # Responsibility
//! - Own the single in-memory brief list mirroring persisted state.
//! - Issue repository operations and reconcile the list after each one.
//! - Re-derive the filtered view whenever data or criteria change.
//!
//! # Invariants
//! - After every successful mutation the list is reloaded wholesale from
//!   the repository; there is no optimistic local patch.
//! - A committed mutation is reported as a success even when the reload
//!   behind it fails.
//! - A failed operation leaves the list and the view untouched and records an
//!   error notice.
//! - Filtering never touches persistence.

use crate::model::brief::{Brief, BriefId, BriefInput};
use crate::repo::brief_repo::{BriefRepository, RepoError};
use crate::search::filter::{filter_briefs, BriefFilter, StatusCounts, StatusFilter};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Controller-level error.
#[derive(Debug)]
pub enum BriefListError {
    /// Form input failed validation before reaching storage.
    InvalidBrief(&'static str),
    Repo(RepoError),
}

impl Display for BriefListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBrief(reason) => write!(f, "invalid brief: {reason}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BriefListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InvalidBrief(_) => None,
        }
    }
}

impl From<RepoError> for BriefListError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// User-facing outcome of the last operation, rendered by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message.as_str(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Application state handed to the rendering collaborator.
#[derive(Debug, Clone, Default)]
pub struct BriefListState {
    briefs: Vec<Brief>,
    filter: BriefFilter,
    visible: Vec<Brief>,
    notice: Option<Notice>,
}

impl BriefListState {
    /// Full list as last loaded from storage.
    pub fn briefs(&self) -> &[Brief] {
        &self.briefs
    }

    /// Subset of `briefs` matching the active filter.
    pub fn visible(&self) -> &[Brief] {
        &self.visible
    }

    pub fn filter(&self) -> &BriefFilter {
        &self.filter
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn replace_briefs(&mut self, briefs: Vec<Brief>) {
        self.briefs = briefs;
        self.refresh_visible();
    }

    fn refresh_visible(&mut self) {
        self.visible = filter_briefs(&self.briefs, &self.filter);
    }
}

/// Orchestrates the in-memory list over a [`BriefRepository`].
pub struct BriefListController<R: BriefRepository> {
    repo: R,
    state: BriefListState,
}

impl<R: BriefRepository> BriefListController<R> {
    /// Creates a controller with an empty list. Call [`Self::load`] next.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: BriefListState::default(),
        }
    }

    pub fn state(&self) -> &BriefListState {
        &self.state
    }

    /// Removes and returns the pending notice once the UI has shown it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.state.notice.take()
    }

    /// Replaces the list with the repository's current collection.
    ///
    /// Returns the number of loaded briefs.
    pub async fn load(&mut self) -> Result<usize, BriefListError> {
        let briefs = match self.repo.list_all().await {
            Ok(briefs) => briefs,
            Err(err) => return Err(self.fail("load", "Failed to load briefs", err)),
        };
        let count = briefs.len();
        self.state.replace_briefs(briefs);
        info!("event=list_load module=service status=ok count={count}");
        Ok(count)
    }

    /// Creates a brief, then reloads the list.
    ///
    /// Once the repository accepted the brief the call succeeds, even if the
    /// follow-up reload fails; the notice then reports the stale list.
    pub async fn create(&mut self, input: BriefInput) -> Result<Brief, BriefListError> {
        let created = match self.repo.create(&input).await {
            Ok(brief) => brief,
            Err(err) => return Err(self.fail("create", "Failed to create brief", err)),
        };
        self.reload_after("create", "Brief created successfully!").await;
        Ok(created)
    }

    /// Replaces one brief, then reloads the list.
    ///
    /// An input without `created_at` keeps the timestamp of the listed
    /// record, so both backends preserve it.
    pub async fn update(
        &mut self,
        id: &BriefId,
        mut input: BriefInput,
    ) -> Result<Brief, BriefListError> {
        if input.created_at.is_none() {
            input.created_at = self
                .state
                .briefs
                .iter()
                .find(|brief| &brief.id == id)
                .map(|brief| brief.created_at.clone());
        }
        let updated = match self.repo.update(id, &input).await {
            Ok(brief) => brief,
            Err(err) => return Err(self.fail("update", "Failed to update brief", err)),
        };
        self.reload_after("update", "Brief updated successfully!").await;
        Ok(updated)
    }

    /// Deletes one brief, then reloads the list.
    pub async fn delete(&mut self, id: &BriefId) -> Result<bool, BriefListError> {
        let deleted = match self.repo.delete(id).await {
            Ok(deleted) => deleted,
            Err(err) => return Err(self.fail("delete", "Failed to delete brief", err)),
        };
        self.reload_after("delete", "Brief deleted.").await;
        Ok(deleted)
    }

    /// Form-submit path: validates, then creates (`target == None`) or
    /// updates the targeted brief.
    ///
    /// # Errors
    /// - `InvalidBrief` when the title is blank; storage is not touched.
    pub async fn submit(
        &mut self,
        target: Option<&BriefId>,
        input: BriefInput,
    ) -> Result<Brief, BriefListError> {
        let title_present = input
            .title
            .as_deref()
            .is_some_and(|title| !title.trim().is_empty());
        if !title_present {
            self.state.notice = Some(Notice::Error("Please enter a title.".to_string()));
            return Err(BriefListError::InvalidBrief("title is required"));
        }

        match target {
            Some(id) => self.update(id, input).await,
            None => self.create(input).await,
        }
    }

    /// Reads one brief straight from the repository, e.g. to open an editor.
    pub async fn fetch(&self, id: &BriefId) -> Result<Option<Brief>, BriefListError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    /// Sets the search criteria and returns the re-derived view.
    pub fn filter(&mut self, query: impl Into<String>, status: StatusFilter) -> &[Brief] {
        self.state.filter = BriefFilter::new(query, status);
        self.state.refresh_visible();
        &self.state.visible
    }

    /// Per-status totals over the full in-memory list.
    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.state.briefs)
    }

    /// Reloads after a committed mutation. A failed reload keeps the old
    /// list and turns the notice into an error naming both outcomes.
    async fn reload_after(&mut self, op: &'static str, success: &str) {
        match self.repo.list_all().await {
            Ok(briefs) => {
                let count = briefs.len();
                self.state.replace_briefs(briefs);
                info!("event=list_{op} module=service status=ok count={count}");
                self.state.notice = Some(Notice::Success(success.to_string()));
            }
            Err(err) => {
                warn!(
                    "event=list_{op} module=service status=error error_code=reload_failed http_status={} error={}",
                    err.status().map_or_else(|| "none".to_string(), |s| s.to_string()),
                    err
                );
                self.state.notice = Some(Notice::Error(format!(
                    "{success} Refreshing the list failed: {err}"
                )));
            }
        }
    }

    fn fail(&mut self, op: &'static str, headline: &str, err: RepoError) -> BriefListError {
        warn!(
            "event=list_{op} module=service status=error http_status={} error={}",
            err.status().map_or_else(|| "none".to_string(), |s| s.to_string()),
            err
        );
        self.state.notice = Some(Notice::Error(format!("{headline}: {err}")));
        BriefListError::Repo(err)
    }
}
