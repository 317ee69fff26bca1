//! # courtside
//!
//! A memoizing HTTP facade over a basketball statistics provider. Every data
//! route is answered through a [`cache::ResponseCache`] keyed by operation name
//! and arguments, so repeat lookups are served from Redis (or memory) instead
//! of going back to the provider.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use courtside::Server;
//! use courtside::cache::{MemoryStore, ResponseCache};
//! use courtside::stats::{SnapshotSource, StatsService, Upstream};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = SnapshotSource::load("snapshot.json")?;
//!     let stats = StatsService::new(Upstream::new(Arc::new(source)));
//!     let cache = ResponseCache::new(Arc::new(MemoryStore::new()));
//!
//!     let router = courtside::api::routes(&cache, stats, "");
//!     let server = Server::bind("127.0.0.1:8000").await?;
//!     server.serve(router, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     }).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod http;
pub mod middleware;
pub mod router;
pub mod server;
pub mod stats;

pub use context::Context;
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use router::Router;
pub use server::{Server, ServerError};
