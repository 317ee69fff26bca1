//! Backing key-value store abstraction.
//!
//! The memoizing layer talks to its store through [`CacheStore`], an object-safe
//! async trait exposing the four commands it needs: `GET`, `SET`, `SETEX` and
//! `DEL`. Two implementations ship with the crate:
//!
//! - [`RedisStore`](super::RedisStore): production store backed by Redis.
//! - [`MemoryStore`]: in-process map with per-entry deadlines, used for local
//!   runs without Redis and throughout the test suite.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Errors raised by a backing store.
///
/// Every variant is treated the same way by the memoizing layer (the store
/// is bypassed for the rest of the call), but the distinction is kept for
/// logs and for store implementations that need to reconnect.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the connection dropped mid-command.
    #[error("backing store unavailable: {0}")]
    Unavailable(String),

    /// The store was reachable but refused the command.
    #[error("backing store rejected {command}: {message}")]
    Command {
        command: &'static str,
        message: String,
    },

    /// `SETEX` was asked for an expiry the store cannot represent.
    #[error("invalid expire time {0:?}")]
    InvalidTtl(Duration),
}

/// A shared, external key-value service with store-managed expiry.
///
/// Implementations must be cheap to share behind an `Arc` and safe to call
/// from many tasks at once. No method is transactional beyond the store's own
/// per-command atomicity.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetches the text stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key` with no expiry.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn set_ex(&self, key: &str, ttl: Duration, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// In-process [`CacheStore`] keeping entries in a map guarded by an async `RwLock`.
///
/// Expired entries are invisible to `get` and are dropped lazily on the next
/// write. Like Redis, `SETEX` with a whole-second expiry of zero is rejected.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    /// Returns `true` if the store holds no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn insert(&self, key: &str, value: &str, expires_at: Option<Instant>) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at,
            },
        );
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.insert(key, value, None).await;
        Ok(())
    }

    async fn set_ex(&self, key: &str, ttl: Duration, value: &str) -> Result<(), StoreError> {
        if ttl.as_secs() == 0 {
            return Err(StoreError::InvalidTtl(ttl));
        }
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or(StoreError::InvalidTtl(ttl))?;
        self.insert(key, value, Some(expires_at)).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
