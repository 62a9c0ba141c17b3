//! Shared Redis connection.

use crate::error::BoardResult;
use crate::queue::BackendConnection;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Client;
use tracing::debug;

/// Multiplexed Redis connection shared by every queue of a deployment.
#[derive(Clone)]
pub struct RedisConnection {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConnection").finish_non_exhaustive()
    }
}

impl RedisConnection {
    /// Wrap an existing connection manager.
    #[must_use]
    pub const fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Open a connection manager for `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the server is unreachable.
    pub async fn connect(url: &str) -> BoardResult<Self> {
        let client = Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self::new(conn))
    }

    /// Handle for issuing commands. Clones share the underlying connection.
    pub(crate) fn manager(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

#[async_trait]
impl BackendConnection for RedisConnection {
    async fn info(&self) -> BoardResult<String> {
        debug!("INFO");
        let mut conn = self.manager();
        let info: String = redis::cmd("INFO").query_async(&mut conn).await?;
        Ok(info)
    }
}
