//! Backend capability traits
//!
//! A backend is a connectable external service kind. Each backend kind
//! implements one of the traits below exactly once and is registered by
//! name; connecting code looks the backend up by the `type` field of its
//! configuration and never references a concrete implementation.

use crate::{DatabaseConfig, ProducerConfig, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// A database backend kind (e.g. postgres, sqlite).
///
/// `validate` is called before any connection attempt and should reject
/// configurations with missing required fields. `connect` constructs a
/// handle but makes no promise that the server is reachable; callers probe
/// the handle with [`DatabaseHandle::ping`] before trusting it.
#[async_trait]
pub trait DatabaseBackend: Send + Sync {
    /// The type name this backend registers under (e.g. "postgres")
    fn name(&self) -> &'static str;

    /// Check the configuration for required fields.
    fn validate(&self, config: &DatabaseConfig) -> Result<()>;

    /// Construct a connection handle from the configuration.
    async fn connect(&self, config: &DatabaseConfig) -> Result<Arc<dyn DatabaseHandle>>;
}

/// A live database connection handle.
///
/// Handles that failed their liveness probe are dropped without an explicit
/// `close`; implementations must make an unhealthy handle safe to drop.
#[async_trait]
pub trait DatabaseHandle: Send + Sync {
    /// The type name of the backend that produced this handle
    fn backend_name(&self) -> &'static str;

    /// Liveness probe: a round trip that confirms the handle is usable,
    /// not merely constructed.
    async fn ping(&self) -> Result<()>;

    /// Apply a maximum-open-connections limit from configuration.
    ///
    /// Called once after a successful connect. The default is a no-op for
    /// backends without a pool to bound.
    fn set_max_connections(&self, _max_connections: usize) {}

    /// Terminate the connection. Idempotent.
    async fn close(&self) -> Result<()>;
}

/// A message producer backend kind (e.g. kafka, dummy).
#[async_trait]
pub trait ProducerBackend: Send + Sync {
    /// The type name this backend registers under (e.g. "kafka")
    fn name(&self) -> &'static str;

    /// Check the configuration for required fields.
    fn validate(&self, config: &ProducerConfig) -> Result<()>;

    /// Construct a producer from the configuration.
    async fn connect(&self, config: &ProducerConfig) -> Result<Arc<dyn Producer>>;
}

/// A live message producer, capable of publishing to the service backing it.
#[async_trait]
pub trait Producer: Send + Sync {
    /// The type name of the backend that produced this handle
    fn backend_name(&self) -> &'static str;

    /// Publish a message to the given topic.
    async fn publish(&self, topic: &str, message: &str) -> Result<()>;

    /// Terminate the connection to the backing service. Idempotent.
    async fn close(&self) -> Result<()>;
}
