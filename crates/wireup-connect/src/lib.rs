//! Wireup Connect - Bounded-retry, concurrent connection bootstrapping
//!
//! This crate is the engine that turns declarative backend configuration
//! into live connections:
//!
//! - `BackoffStrategy` - wait policy between failed connect attempts
//! - `connect_with_retries` - the generic retry-connect loop
//! - `Opener` - connects to multiple backends in parallel with
//!   all-or-nothing semantics
//! - `Connections` - the resulting bundle of live handles
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use wireup_connect::{BackendRegistry, BackoffStrategy, Opener};
//!
//! let registry = Arc::new(BackendRegistry::with_defaults());
//! let connections = Opener::new(registry)
//!     .with_retry(5, BackoffStrategy::exponential(
//!         Duration::from_millis(100),
//!         Duration::from_secs(30),
//!         2.0,
//!     ))
//!     .with_database(db_config)
//!     .with_producer(producer_config)
//!     .connect()
//!     .await?;
//! ```

mod backoff;
mod opener;
mod retry;

pub use backoff::BackoffStrategy;
pub use opener::{Connections, Opener, connect_database, connect_producer};
pub use retry::connect_with_retries;

/// Re-export commonly used types from the other wireup crates
pub use wireup_backends::BackendRegistry;
pub use wireup_core::{
    BrokerAddr, DatabaseConfig, DatabaseHandle, Producer, ProducerConfig, Result, WireupError,
};
