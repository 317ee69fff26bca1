use std::fmt;

use thiserror::Error;

use super::store::StoreError;

/// Failures inside the caching machinery itself.
///
/// These are logged and contained by [`Memoized::call`](super::Memoized::call);
/// they never reach the caller of a memoized producer.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache key could not be derived from the call arguments")]
    Key(#[from] fmt::Error),

    #[error("rendering the call arguments panicked")]
    KeyPanicked,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("result could not be encoded for the cache: {0}")]
    Encode(#[from] serde_json::Error),
}
