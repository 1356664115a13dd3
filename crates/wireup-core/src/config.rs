//! Declarative connection configuration
//!
//! These are plain value structs with no behavior beyond field access and
//! address formatting. Decoding them from a config file is the caller's
//! concern; the field names and renames below match the documented TOML
//! shape so a `[database]` / `[producer]` section deserializes directly.

use serde::{Deserialize, Serialize};

/// Settings for a database connection.
///
/// Expected TOML shape:
///
/// ```toml
/// [database]
/// type = "postgres"
/// host = "localhost"
/// port = 5432
/// user = "test"
/// password = "test"
/// dbname = "test"
/// ssl = "disable"
/// max_connections = 10
/// ```
///
/// For the sqlite backend, `host` is a file path or `:memory:` and the
/// remaining fields are unused.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Registered backend type name (e.g. "postgres", "sqlite")
    #[serde(rename = "type")]
    pub backend: String,

    /// Server hostname, or file path for file-backed databases
    pub host: String,

    /// Server port
    #[serde(default)]
    pub port: u16,

    /// Database name
    #[serde(default)]
    pub dbname: String,

    /// Username
    #[serde(default)]
    pub user: String,

    /// Password
    #[serde(default)]
    pub password: String,

    /// SSL mode (e.g. "disable", "require")
    #[serde(default)]
    pub ssl: String,

    /// Maximum number of open connections, applied after a successful connect
    #[serde(default)]
    pub max_connections: usize,
}

impl DatabaseConfig {
    /// The server address in `host:port` form.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for a message producer connection.
///
/// Expected TOML shape:
///
/// ```toml
/// [producer]
/// type = "kafka"
/// retries = 5
///
/// [[producers]]
/// host = "broker-1"
/// port = 9092
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProducerConfig {
    /// Registered backend type name (e.g. "kafka", "dummy")
    #[serde(rename = "type")]
    pub backend: String,

    /// Send retry count handed to the underlying driver
    #[serde(default)]
    pub retries: i32,

    /// Broker addresses, in connection order
    #[serde(default)]
    pub hosts: Vec<BrokerAddr>,
}

/// A single broker address
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BrokerAddr {
    pub host: String,
    pub port: u16,
}

impl BrokerAddr {
    /// The broker address in `host:port` form.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
