//! Durable string key-value slots.
//!
//! # Responsibility
//! - Provide the local storage substrate: whole-value reads and writes under
//!   fixed keys.
//! - Surface quota and I/O failures instead of swallowing them.
//!
//! # Invariants
//! - `set` replaces the full value of a key (upsert).
//! - A value larger than the configured quota is never written.

use crate::db::DbError;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of the local key-value store.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Value would exceed the per-value storage quota.
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },
    /// Another caller panicked while holding the connection.
    Poisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded { key, size, limit } => write!(
                f,
                "storage quota exceeded for `{key}`: {size} bytes > {limit} bytes"
            ),
            Self::Poisoned => write!(f, "storage connection is poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-value storage contract used by local persistence and preferences.
pub trait KeyValueStore: Send + Sync {
    /// Reads one value. Absence is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Writes one value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes one key. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// SQLite-backed key-value store over the `kv_entries` table.
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
    quota_bytes: Option<usize>,
}

impl SqliteKeyValueStore {
    /// Wraps a migrated connection (see [`crate::db::open_db`]).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            quota_bytes: None,
        }
    }

    /// Caps the size of any single stored value, like browser storage does.
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&conn)
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT value FROM kv_entries WHERE key = ?1;",
                    [key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?)
        })
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if let Some(limit) = self.quota_bytes {
            if value.len() > limit {
                warn!(
                    "event=kv_set module=store status=error error_code=quota_exceeded key={} size={} limit={}",
                    key,
                    value.len(),
                    limit
                );
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    size: value.len(),
                    limit,
                });
            }
        }

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, SqliteKeyValueStore, StoreError};
    use crate::db::open_db_in_memory;

    fn store() -> SqliteKeyValueStore {
        SqliteKeyValueStore::new(open_db_in_memory().expect("in-memory db"))
    }

    #[test]
    fn set_replaces_previous_value() {
        let store = store();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn remove_absent_key_is_ok() {
        let store = store();
        store.remove("missing").unwrap();
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn quota_rejects_oversized_value_and_keeps_old_one() {
        let store = store().with_quota(4);
        store.set("k", "abcd").unwrap();
        let err = store.set("k", "abcde").unwrap_err();
        assert!(matches!(
            err,
            StoreError::QuotaExceeded {
                size: 5,
                limit: 4,
                ..
            }
        ));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("abcd"));
    }
}
