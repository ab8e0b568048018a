//! Local key-value backend for the brief collection.
//!
//! # Responsibility
//! - Keep the whole collection as one JSON array under [`BRIEFS_KEY`].
//! - Assign time-derived ids on create.
//! - Normalize stored items the same way the remote backend does: `null`
//!   and absent fields take model defaults.
//!
//! # Invariants
//! - Every mutation rewrites the full array; there is no partial write.
//! - Issued ids strictly increase within a process and never collide with a
//!   stored id.
//! - `delete` of an absent id succeeds.
//! - Failed `update` leaves the stored array untouched.

use crate::model::brief::{Brief, BriefId, BriefInput};
use crate::repo::brief_repo::{BriefRepository, RepoError, RepoResult};
use crate::store::kv_store::KeyValueStore;
use crate::store::BRIEFS_KEY;
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_ISSUED_MS: AtomicI64 = AtomicI64::new(0);

/// Brief repository over a [`KeyValueStore`].
pub struct LocalBriefRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> LocalBriefRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read_all(&self) -> RepoResult<Vec<Brief>> {
        let Some(raw) = self.store.get(BRIEFS_KEY)? else {
            return Ok(Vec::new());
        };
        let items: Vec<BriefInput> = serde_json::from_str(&raw).map_err(|err| {
            RepoError::InvalidData(format!("stored `{BRIEFS_KEY}` is not a brief array: {err}"))
        })?;
        items
            .into_iter()
            .map(|item| {
                let id = item.id.clone().ok_or_else(|| {
                    RepoError::InvalidData(format!("stored `{BRIEFS_KEY}` item carries no id"))
                })?;
                Ok(Brief::build(id, item))
            })
            .collect()
    }

    fn write_all(&self, briefs: &[Brief]) -> RepoResult<()> {
        let raw = serde_json::to_string(briefs)
            .map_err(|err| RepoError::InvalidData(format!("cannot encode briefs: {err}")))?;
        self.store.set(BRIEFS_KEY, &raw)?;
        Ok(())
    }
}

#[async_trait]
impl<S: KeyValueStore> BriefRepository for LocalBriefRepository<S> {
    async fn create(&self, input: &BriefInput) -> RepoResult<Brief> {
        let mut briefs = self.read_all()?;
        let id = issue_id(&briefs);
        let brief = Brief::build(id, input.clone());
        briefs.push(brief.clone());
        self.write_all(&briefs)?;

        info!(
            "event=brief_create module=repo backend=local status=ok id={} count={}",
            brief.id,
            briefs.len()
        );
        Ok(brief)
    }

    async fn list_all(&self) -> RepoResult<Vec<Brief>> {
        let briefs = self.read_all()?;
        debug!(
            "event=brief_list module=repo backend=local status=ok count={}",
            briefs.len()
        );
        Ok(briefs)
    }

    async fn get_by_id(&self, id: &BriefId) -> RepoResult<Option<Brief>> {
        Ok(self.read_all()?.into_iter().find(|brief| &brief.id == id))
    }

    async fn update(&self, id: &BriefId, input: &BriefInput) -> RepoResult<Brief> {
        let mut briefs = self.read_all()?;
        let Some(slot) = briefs.iter_mut().find(|brief| &brief.id == id) else {
            warn!("event=brief_update module=repo backend=local status=error error_code=not_found id={id}");
            return Err(RepoError::NotFound(id.clone()));
        };

        let mut input = input.clone();
        if input.created_at.is_none() {
            input.created_at = Some(slot.created_at.clone());
        }
        let updated = Brief::build(id.clone(), input);
        *slot = updated.clone();
        self.write_all(&briefs)?;

        info!("event=brief_update module=repo backend=local status=ok id={id}");
        Ok(updated)
    }

    async fn delete(&self, id: &BriefId) -> RepoResult<bool> {
        let mut briefs = self.read_all()?;
        let before = briefs.len();
        briefs.retain(|brief| &brief.id != id);
        self.write_all(&briefs)?;

        info!(
            "event=brief_delete module=repo backend=local status=ok id={} removed={}",
            id,
            before - briefs.len()
        );
        Ok(true)
    }
}

/// Issues a millisecond-timestamp id, bumped past the last issued one and
/// past any id already present in `existing`.
fn issue_id(existing: &[Brief]) -> BriefId {
    loop {
        let now = Utc::now().timestamp_millis();
        let previous = LAST_ISSUED_MS
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        let id = BriefId::new(now.max(previous + 1).to_string());
        if !existing.iter().any(|brief| brief.id == id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::issue_id;
    use std::collections::HashSet;

    #[test]
    fn issued_ids_are_unique_in_a_tight_loop() {
        let ids = (0..500)
            .map(|_| issue_id(&[]).into_string())
            .collect::<HashSet<_>>();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn issued_ids_strictly_increase() {
        let first: i64 = issue_id(&[]).as_str().parse().unwrap();
        let second: i64 = issue_id(&[]).as_str().parse().unwrap();
        assert!(second > first);
    }
}
