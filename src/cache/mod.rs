//! Caching layer: read-through memoization of async producers over a
//! key-value backing store.
//!
//! ## Pieces
//!
//! - [`CacheStore`]: `GET`/`SET`/`SETEX`/`DEL` seam, with [`RedisStore`] and
//!   [`MemoryStore`] implementations.
//! - [`CacheArgs`] / [`derive_key`]: deterministic keys from producer name and arguments.
//! - [`Cacheable`] / [`Record`] / [`Shape`]: how a producer result is encoded.
//! - [`ResponseCache`] / [`Memoized`]: the wrapper itself.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use courtside::cache::{CacheOptions, Expiry, MemoryStore, Positional, ResponseCache};
//! use serde_json::{Value, json};
//!
//! # async fn example() -> Result<(), std::io::Error> {
//! let cache = ResponseCache::new(Arc::new(MemoryStore::new()));
//! let lookup = cache.memoize(
//!     "lookup",
//!     CacheOptions::new().expiry(Expiry::seconds(86_400)),
//!     |Positional((id,)): Positional<(u32,)>| async move {
//!         Ok::<Value, std::io::Error>(json!({ "id": id }))
//!     },
//! );
//!
//! let first = lookup.call(Positional((7,))).await?; // producer runs
//! let again = lookup.call(Positional((7,))).await?; // served from the store
//! assert!(!first.is_cached() && again.is_cached());
//! # Ok(())
//! # }
//! ```

mod error;
mod key;
mod memoize;
mod payload;
mod redis_store;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use error::CacheError;
pub use key::{CacheArgs, Positional, derive_key};
pub use memoize::{CacheOptions, DEFAULT_TTL, Expiry, Fetched, Memoized, ResponseCache};
pub use payload::{Cacheable, Record, Shape};
pub use redis_store::RedisStore;
pub use store::{CacheStore, MemoryStore, StoreError};
