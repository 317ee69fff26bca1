use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use courtside::api;
use courtside::cache::{CacheStore, MemoryStore, RedisStore, ResponseCache};
use courtside::config::Config;
use courtside::stats::{SnapshotSource, StatsService, Upstream};
use courtside::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("courtside=info")),
        )
        .init();

    let config = Config::parse();
    let addr = config.validate()?;

    let store = open_store(&config).await?;

    let source = match &config.snapshot {
        Some(path) => {
            info!(path = %path.display(), "loading provider snapshot");
            SnapshotSource::load(path)?
        }
        None => {
            warn!("no snapshot configured, provider answers will be empty");
            SnapshotSource::default()
        }
    };
    let stats = StatsService::new(Upstream::new(Arc::new(source)));

    let cache = ResponseCache::new(store);
    let router = api::routes(&cache, stats, &config.cache_namespace);

    let server = Server::bind(addr.to_string()).await?;
    server
        .serve(router, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!("courtside stopped");
    Ok(())
}

async fn open_store(config: &Config) -> Result<Arc<dyn CacheStore>, Box<dyn std::error::Error>> {
    if config.memory_store {
        info!("using in-process cache store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = RedisStore::open(&config.redis_url)?;
    // Requests bypass the cache until redis comes back.
    if let Err(e) = store.connect().await {
        warn!(error = %e, "redis unreachable at startup");
    }
    Ok(Arc::new(store))
}
