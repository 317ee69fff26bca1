//! The memoizing response cache.
//!
//! [`ResponseCache::memoize`] wraps an async producer `Fn(A) -> Future<Output =
//! Result<T, E>>` into a [`Memoized`] with the same call contract. Per call:
//!
//! ```text
//! derive key ──fail──────────────────────────────────► producer ─► Fresh
//!     │
//!   GET ──store error──────────────────────────────────► producer ─► Fresh
//!     │
//!     ├─ hit, parses ──────────────────────────────────────────────► Cached
//!     ├─ hit, corrupt ─► DEL ──store error─────────────► producer ─► Fresh
//!     │                   └─► miss
//!     └─ miss ─► producer ─► encode + SET/SETEX (best effort) ──────► Fresh
//! ```
//!
//! The wrapped call returns [`Fetched<T>`] rather than the producer's bare `T`:
//! a hit carries the untyped JSON read back from the store, since stored text
//! keeps no type information. [`Fetched::into_json`] gives both variants the
//! same client-facing form.
//!
//! Only producer errors reach the caller. Dropping the returned future cancels
//! the call wherever it is suspended; nothing here intercepts that.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::error::CacheError;
use super::key::{CacheArgs, derive_key};
use super::payload::Cacheable;
use super::store::{CacheStore, StoreError};

/// Expiry applied when no other is configured: four days.
pub const DEFAULT_TTL: Duration = Duration::from_secs(345_600);

/// How long a written entry lives in the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Written with `SETEX`; the store expires the entry after this long.
    After(Duration),
    /// Written with `SET`; the entry lives until overwritten or deleted.
    Never,
}

impl Expiry {
    /// Shorthand for `Expiry::After(Duration::from_secs(secs))`.
    pub const fn seconds(secs: u64) -> Self {
        Self::After(Duration::from_secs(secs))
    }
}

impl Default for Expiry {
    fn default() -> Self {
        Self::After(DEFAULT_TTL)
    }
}

/// Per-producer cache configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheOptions {
    pub expiry: Expiry,
    /// Prefix separating otherwise identical producer names.
    pub namespace: String,
}

impl CacheOptions {
    /// Default options: four-day expiry, empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn expiry(mut self, expiry: Expiry) -> Self {
        self.expiry = expiry;
        self
    }

    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// Result of a memoized call.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    /// Served from the store. Record types come back as plain maps and arrays.
    Cached(Value),
    /// Produced by this call.
    Fresh(T),
}

impl<T> Fetched<T> {
    /// Returns `true` if the value came from the backing store.
    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }

    /// Returns the produced value, or `None` for a cache hit.
    pub fn fresh(self) -> Option<T> {
        match self {
            Self::Fresh(value) => Some(value),
            Self::Cached(_) => None,
        }
    }
}

impl<T: Cacheable> Fetched<T> {
    /// Converts either variant into the JSON a client would see.
    pub fn into_json(self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Cached(value) => Ok(value),
            Self::Fresh(value) => value.to_json(),
        }
    }
}

/// Factory for memoized producers sharing one backing store.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Wraps `producer` so its results are cached under keys derived from `name`.
    ///
    /// `name` plays the part of the producer's identity in the key, so two
    /// producers must not share a name within one namespace.
    pub fn memoize<F>(&self, name: &'static str, options: CacheOptions, producer: F) -> Memoized<F> {
        Memoized {
            name,
            options,
            store: Arc::clone(&self.store),
            producer,
        }
    }
}

enum Lookup {
    Hit(Value),
    Miss,
    Bypass(StoreError),
}

/// A producer wrapped with read-through caching.
pub struct Memoized<F> {
    name: &'static str,
    options: CacheOptions,
    store: Arc<dyn CacheStore>,
    producer: F,
}

impl<F> Memoized<F> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Calls the producer through the cache.
    ///
    /// The producer runs at most once per call. Its error, if any, is returned
    /// unchanged and nothing is written.
    pub async fn call<A, Fut, T, E>(&self, args: A) -> Result<Fetched<T>, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        A: CacheArgs,
        T: Cacheable,
    {
        let key = match self.key_for(&args) {
            Ok(key) => key,
            Err(e) => {
                warn!(producer = self.name, error = %e, "bypassing cache");
                return (self.producer)(args).await.map(Fetched::Fresh);
            }
        };

        match self.lookup(&key).await {
            Lookup::Hit(value) => {
                debug!(key = %key, "cache hit");
                return Ok(Fetched::Cached(value));
            }
            Lookup::Bypass(e) => {
                warn!(key = %key, error = %e, "cache store failed, bypassing cache");
                return (self.producer)(args).await.map(Fetched::Fresh);
            }
            Lookup::Miss => debug!(key = %key, "cache miss"),
        }

        let value = (self.producer)(args).await?;

        // Encoded up front so no borrow of `value` is held across the store call.
        match value.encode() {
            Ok(text) => {
                if let Err(e) = self.write(&key, &text).await {
                    warn!(key = %key, error = %e, "failed to write cache entry");
                }
            }
            Err(e) => {
                warn!(key = %key, shape = ?value.shape(), error = %CacheError::from(e), "failed to encode cache entry");
            }
        }

        Ok(Fetched::Fresh(value))
    }

    /// Derives the key for `args`, containing a panicking argument renderer.
    fn key_for<A: CacheArgs>(&self, args: &A) -> Result<String, CacheError> {
        panic::catch_unwind(AssertUnwindSafe(|| {
            derive_key(&self.options.namespace, self.name, args)
        }))
        .map_err(|_| CacheError::KeyPanicked)?
        .map_err(CacheError::from)
    }

    async fn lookup(&self, key: &str) -> Lookup {
        let text = match self.store.get(key).await {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => return Lookup::Miss,
            Err(e) => return Lookup::Bypass(e),
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Lookup::Hit(value),
            Err(e) => {
                warn!(key = %key, error = %e, "discarding corrupted cache entry");
                match self.store.delete(key).await {
                    Ok(()) => Lookup::Miss,
                    Err(e) => Lookup::Bypass(e),
                }
            }
        }
    }

    async fn write(&self, key: &str, text: &str) -> Result<(), StoreError> {
        match self.options.expiry {
            Expiry::After(ttl) => self.store.set_ex(key, ttl, text).await,
            Expiry::Never => self.store.set(key, text).await,
        }
    }
}
