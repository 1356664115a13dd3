//! Wireup Core - Core abstractions for connection bootstrapping
//!
//! This crate provides the fundamental traits and types that the other
//! wireup crates depend on. It defines:
//!
//! - `DatabaseBackend` / `ProducerBackend` - Capability traits implemented
//!   once per connectable backend kind
//! - `DatabaseHandle` / `Producer` - Traits for live connection handles
//! - `DatabaseConfig` / `ProducerConfig` - Declarative connection settings
//! - `WireupError` - Common error type

mod backend;
mod config;
mod error;

pub use backend::{DatabaseBackend, DatabaseHandle, Producer, ProducerBackend};
pub use config::{BrokerAddr, DatabaseConfig, ProducerConfig};
pub use error::{Result, WireupError};
