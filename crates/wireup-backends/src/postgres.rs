//! PostgreSQL database backend
//!
//! Connections are held in a deadpool pool so the configured
//! `max_connections` limit has something to bound. Building the pool does
//! not open a socket; the first real round trip happens on the liveness
//! probe, which checks out a connection and runs `SELECT 1`.

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use std::sync::Arc;
use tokio_postgres::config::SslMode;
use wireup_core::{DatabaseBackend, DatabaseConfig, DatabaseHandle, Result, WireupError};

/// PostgreSQL database backend
pub struct PostgresBackend;

impl PostgresBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PostgresBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn ssl_mode(ssl: &str) -> SslMode {
    match ssl {
        "disable" => SslMode::Disable,
        "prefer" => SslMode::Prefer,
        _ => SslMode::Require,
    }
}

#[async_trait]
impl DatabaseBackend for PostgresBackend {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn validate(&self, config: &DatabaseConfig) -> Result<()> {
        if config.host.is_empty() {
            return Err(WireupError::Configuration(
                "postgres: host not specified".to_string(),
            ));
        }
        if config.user.is_empty() {
            return Err(WireupError::Configuration(
                "postgres: user not specified".to_string(),
            ));
        }
        if config.port == 0 {
            return Err(WireupError::Configuration(
                "postgres: port not specified".to_string(),
            ));
        }
        if config.dbname.is_empty() {
            return Err(WireupError::Configuration(
                "postgres: dbname not specified".to_string(),
            ));
        }
        if config.ssl.is_empty() {
            return Err(WireupError::Configuration(
                "postgres: ssl mode not specified".to_string(),
            ));
        }
        if config.password.is_empty() {
            return Err(WireupError::Configuration(
                "postgres: password not specified".to_string(),
            ));
        }
        Ok(())
    }

    async fn connect(&self, config: &DatabaseConfig) -> Result<Arc<dyn DatabaseHandle>> {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&config.host)
            .port(config.port)
            .user(&config.user)
            .password(&config.password)
            .dbname(&config.dbname)
            .ssl_mode(ssl_mode(&config.ssl));

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let manager = if config.ssl == "disable" {
            Manager::from_config(pg, tokio_postgres::NoTls, mgr_config)
        } else {
            let connector = native_tls::TlsConnector::builder()
                .build()
                .map_err(|err| WireupError::Connection(err.to_string()))?;
            let tls = postgres_native_tls::MakeTlsConnector::new(connector);
            Manager::from_config(pg, tls, mgr_config)
        };

        let pool = Pool::builder(manager)
            .build()
            .map_err(|err| WireupError::Connection(err.to_string()))?;
        tracing::debug!(address = %config.address(), dbname = %config.dbname, "built postgres pool");
        Ok(Arc::new(PostgresHandle { pool }))
    }
}

/// Handle around a postgres connection pool
pub struct PostgresHandle {
    pool: Pool,
}

#[async_trait]
impl DatabaseHandle for PostgresHandle {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<()> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|err| WireupError::Connection(err.to_string()))?;
        client
            .simple_query("SELECT 1")
            .await
            .map_err(|err| WireupError::Connection(err.to_string()))?;
        Ok(())
    }

    fn set_max_connections(&self, max_connections: usize) {
        if max_connections > 0 {
            self.pool.resize(max_connections);
        }
    }

    async fn close(&self) -> Result<()> {
        self.pool.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DatabaseConfig {
        DatabaseConfig {
            backend: "postgres".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            dbname: "app".to_string(),
            user: "test".to_string(),
            password: "secret".to_string(),
            ssl: "disable".to_string(),
            max_connections: 10,
        }
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(PostgresBackend::new().validate(&config()).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let backend = PostgresBackend::new();
        let cases: [fn(&mut DatabaseConfig); 6] = [
            |c| c.host.clear(),
            |c| c.user.clear(),
            |c| c.port = 0,
            |c| c.dbname.clear(),
            |c| c.ssl.clear(),
            |c| c.password.clear(),
        ];
        for clear in cases {
            let mut config = config();
            clear(&mut config);
            let err = backend.validate(&config).unwrap_err();
            assert!(matches!(err, WireupError::Configuration(_)), "{err}");
        }
    }

    #[test]
    fn test_ssl_mode_mapping() {
        assert!(matches!(ssl_mode("disable"), SslMode::Disable));
        assert!(matches!(ssl_mode("prefer"), SslMode::Prefer));
        assert!(matches!(ssl_mode("require"), SslMode::Require));
        assert!(matches!(ssl_mode("verify-full"), SslMode::Require));
    }

    #[tokio::test]
    async fn test_connect_builds_pool_without_server() {
        // Pool construction is lazy; reachability is the probe's job.
        let backend = PostgresBackend::new();
        let handle = backend.connect(&config()).await.unwrap();
        handle.set_max_connections(10);
        handle.close().await.unwrap();
    }
}
