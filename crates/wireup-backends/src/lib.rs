//! Wireup Backends - Concrete backend implementations
//!
//! This crate provides the backend registry plus implementations of the
//! backend traits defined in `wireup-core`, gated behind cargo features.

#[cfg(feature = "dummy")]
pub mod dummy;
#[cfg(feature = "kafka")]
pub mod kafka;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

mod registry;

pub use registry::BackendRegistry;

/// Re-export commonly used types from wireup-core
pub use wireup_core::{
    BrokerAddr, DatabaseBackend, DatabaseConfig, DatabaseHandle, Producer, ProducerBackend,
    ProducerConfig, Result, WireupError,
};
