//! SQLite database backend
//!
//! The `host` field of the configuration is interpreted as a file path, or
//! `:memory:` for an in-memory database. The remaining database fields are
//! unused.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use wireup_core::{DatabaseBackend, DatabaseConfig, DatabaseHandle, Result, WireupError};

/// SQLite database backend
pub struct SqliteBackend;

impl SqliteBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SqliteBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn validate(&self, config: &DatabaseConfig) -> Result<()> {
        if config.host.is_empty() {
            return Err(WireupError::Configuration(
                "sqlite: host not specified".to_string(),
            ));
        }
        Ok(())
    }

    async fn connect(&self, config: &DatabaseConfig) -> Result<Arc<dyn DatabaseHandle>> {
        let conn = rusqlite::Connection::open(&config.host)
            .map_err(|err| WireupError::Connection(err.to_string()))?;
        tracing::debug!(path = %config.host, "opened sqlite database");
        Ok(Arc::new(SqliteHandle {
            conn: Mutex::new(Some(conn)),
        }))
    }
}

/// Handle around a single sqlite connection.
///
/// rusqlite connections are not `Sync`, so the connection lives behind a
/// mutex and every operation takes the lock for its full duration.
pub struct SqliteHandle {
    conn: Mutex<Option<rusqlite::Connection>>,
}

#[async_trait]
impl DatabaseHandle for SqliteHandle {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn ping(&self) -> Result<()> {
        let guard = self.conn.lock();
        let conn = guard
            .as_ref()
            .ok_or_else(|| WireupError::Connection("sqlite connection is closed".to_string()))?;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|err| WireupError::Connection(err.to_string()))
    }

    async fn close(&self) -> Result<()> {
        let conn = self.conn.lock().take();
        if let Some(conn) = conn {
            conn.close()
                .map_err(|(_, err)| WireupError::Connection(err.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: &str) -> DatabaseConfig {
        DatabaseConfig {
            backend: "sqlite".to_string(),
            host: host.to_string(),
            port: 0,
            dbname: String::new(),
            user: String::new(),
            password: String::new(),
            ssl: String::new(),
            max_connections: 0,
        }
    }

    #[test]
    fn test_validate_requires_host() {
        let backend = SqliteBackend::new();
        assert!(backend.validate(&config("")).is_err());
        assert!(backend.validate(&config(":memory:")).is_ok());
    }

    #[tokio::test]
    async fn test_connect_ping_close_in_memory() {
        let backend = SqliteBackend::new();
        let handle = backend.connect(&config(":memory:")).await.unwrap();
        handle.ping().await.unwrap();
        handle.close().await.unwrap();
        // closed handles fail the probe, and a second close is a no-op
        assert!(handle.ping().await.is_err());
        handle.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_against_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let backend = SqliteBackend::new();
        let handle = backend
            .connect(&config(path.to_str().unwrap()))
            .await
            .unwrap();
        handle.ping().await.unwrap();
        handle.close().await.unwrap();
        assert!(path.exists());
    }
}
