//! Redis-backed [`CacheStore`].

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::store::{CacheStore, StoreError};

/// Redis store over a single multiplexed connection.
///
/// The connection is opened on first use rather than at construction, so a
/// facade started while Redis is down still serves every request straight
/// from the producer. Connection-level failures drop the cached connection;
/// the next command reconnects.
pub struct RedisStore {
    client: Client,
    conn: RwLock<Option<MultiplexedConnection>>,
}

impl RedisStore {
    /// Creates a store for the given `redis://` URL without connecting.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the URL cannot be parsed.
    pub fn open(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            conn: RwLock::new(None),
        })
    }

    /// Opens the connection eagerly. Failure is reported but not fatal.
    pub async fn connect(&self) -> Result<(), StoreError> {
        self.connection().await.map(|_| ())
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
        if let Some(conn) = self.conn.read().await.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        info!("connected to redis");

        *self.conn.write().await = Some(conn.clone());
        Ok(conn)
    }

    async fn classify(&self, command: &'static str, err: RedisError) -> StoreError {
        if err.is_io_error()
            || err.is_connection_dropped()
            || err.is_connection_refusal()
            || err.is_timeout()
        {
            debug!(command, error = %err, "dropping redis connection");
            self.conn.write().await.take();
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Command {
                command,
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection().await?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => Ok(value),
            Err(e) => Err(self.classify("GET", e).await),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        match conn.set::<_, _, ()>(key, value).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.classify("SET", e).await),
        }
    }

    async fn set_ex(&self, key: &str, ttl: Duration, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        match conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.classify("SETEX", e).await),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        match conn.del::<_, i64>(key).await {
            Ok(_) => Ok(()),
            Err(e) => Err(self.classify("DEL", e).await),
        }
    }
}
