//! Multi-backend opener
//!
//! Connects to every configured backend in parallel and returns either a
//! bundle of live connections or the first error observed. On a partial
//! failure the backends that did connect are closed before the error is
//! surfaced, so a failed `connect` never leaks a live connection.

use crate::backoff::BackoffStrategy;
use crate::retry::connect_with_retries;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use wireup_backends::BackendRegistry;
use wireup_core::{
    DatabaseConfig, DatabaseHandle, Producer, ProducerConfig, Result, WireupError,
};

/// How long a failed `connect` waits for partially-opened backends to close
/// before returning the error anyway.
const CLEANUP_GRACE: Duration = Duration::from_secs(5);

/// Builder that connects to several backends concurrently.
///
/// Accumulates an optional database configuration, an optional producer
/// configuration, and a shared retry policy, then opens everything in one
/// `connect` call with all-or-nothing semantics.
pub struct Opener {
    registry: Arc<BackendRegistry>,
    database: Option<DatabaseConfig>,
    producer: Option<ProducerConfig>,
    attempts: i32,
    backoff: BackoffStrategy,
}

impl Opener {
    /// Create an opener over the given registry with no backends configured
    /// and a single-attempt retry policy.
    pub fn new(registry: Arc<BackendRegistry>) -> Self {
        Self {
            registry,
            database: None,
            producer: None,
            attempts: 1,
            backoff: BackoffStrategy::constant(Duration::from_secs(1)),
        }
    }

    /// Set the retry policy shared by every backend connect.
    pub fn with_retry(mut self, attempts: i32, backoff: BackoffStrategy) -> Self {
        self.attempts = attempts;
        self.backoff = backoff;
        self
    }

    /// Request a database connection.
    pub fn with_database(mut self, config: DatabaseConfig) -> Self {
        self.database = Some(config);
        self
    }

    /// Request a producer connection.
    pub fn with_producer(mut self, config: ProducerConfig) -> Self {
        self.producer = Some(config);
        self
    }

    /// Connect to every configured backend concurrently.
    ///
    /// One task is spawned per configured backend; the call returns only
    /// after all of them have finished. If any backend fails, the first
    /// error observed is returned, later errors are dropped, and whatever
    /// did connect is closed before this returns.
    pub async fn connect(self) -> Result<Connections> {
        let Self {
            registry,
            database,
            producer,
            attempts,
            backoff,
        } = self;

        let errors = Arc::new(ErrorSink::default());

        let database_task = database.map(|config| {
            let registry = Arc::clone(&registry);
            let backoff = backoff.clone();
            let errors = Arc::clone(&errors);
            tokio::spawn(async move {
                match connect_database(&registry, &config, attempts, &backoff).await {
                    Ok(handle) => Some(handle),
                    Err(err) => {
                        errors.record(err);
                        None
                    }
                }
            })
        });

        let producer_task = producer.map(|config| {
            let registry = Arc::clone(&registry);
            let backoff = backoff.clone();
            let errors = Arc::clone(&errors);
            tokio::spawn(async move {
                match connect_producer(&registry, &config, attempts, &backoff).await {
                    Ok(producer) => Some(producer),
                    Err(err) => {
                        errors.record(err);
                        None
                    }
                }
            })
        });

        // Join barrier: nothing is observed until every task has finished.
        let database = match database_task {
            Some(task) => task.await.map_err(task_panic)?,
            None => None,
        };
        let producer = match producer_task {
            Some(task) => task.await.map_err(task_panic)?,
            None => None,
        };

        if let Some(err) = errors.take() {
            // A sibling backend may have connected. Close it before
            // surfacing the error, waiting only a bounded grace period so a
            // slow close cannot hold up the caller.
            let cleanup = tokio::spawn(async move {
                if let Some(handle) = database {
                    if let Err(close_err) = handle.close().await {
                        tracing::warn!(error = %close_err, "failed to close database after aborted connect");
                    }
                }
                if let Some(producer) = producer {
                    if let Err(close_err) = producer.close().await {
                        tracing::warn!(error = %close_err, "failed to close producer after aborted connect");
                    }
                }
            });
            if tokio::time::timeout(CLEANUP_GRACE, cleanup).await.is_err() {
                tracing::warn!("cleanup of partially-opened backends timed out");
            }
            return Err(err);
        }

        Ok(Connections { database, producer })
    }
}

/// Connect to a database backend: registry lookup, config validation, then
/// the retry loop with a liveness probe per attempt.
pub async fn connect_database(
    registry: &BackendRegistry,
    config: &DatabaseConfig,
    attempts: i32,
    backoff: &BackoffStrategy,
) -> Result<Arc<dyn DatabaseHandle>> {
    let backend = registry.database(&config.backend).ok_or_else(|| {
        WireupError::Configuration(format!(
            "unknown database type {:?} (was the backend registered?)",
            config.backend
        ))
    })?;
    backend.validate(config)?;
    let handle = connect_with_retries("database", attempts, backoff, |_attempt| {
        let backend = Arc::clone(&backend);
        let config = config.clone();
        async move {
            let handle = backend.connect(&config).await?;
            // A constructed handle that fails the probe is dropped, not
            // closed; the next attempt starts from scratch.
            handle.ping().await?;
            Ok(handle)
        }
    })
    .await?;
    handle.set_max_connections(config.max_connections);
    Ok(handle)
}

/// Connect to a producer backend: registry lookup, config validation, then
/// the retry loop. Producers have no liveness probe.
pub async fn connect_producer(
    registry: &BackendRegistry,
    config: &ProducerConfig,
    attempts: i32,
    backoff: &BackoffStrategy,
) -> Result<Arc<dyn Producer>> {
    let backend = registry.producer(&config.backend).ok_or_else(|| {
        WireupError::Configuration(format!(
            "unknown producer type {:?} (was the backend registered?)",
            config.backend
        ))
    })?;
    backend.validate(config)?;
    connect_with_retries("producer", attempts, backoff, |_attempt| {
        let backend = Arc::clone(&backend);
        let config = config.clone();
        async move { backend.connect(&config).await }
    })
    .await
}

/// The live connections produced by a successful [`Opener::connect`].
///
/// Each slot is populated only if the corresponding backend was requested.
/// The bundle owns its handles; closing it closes both.
pub struct Connections {
    database: Option<Arc<dyn DatabaseHandle>>,
    producer: Option<Arc<dyn Producer>>,
}

impl std::fmt::Debug for Connections {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connections")
            .field("database", &self.database.as_ref().map(|d| d.backend_name()))
            .field("producer", &self.producer.as_ref().map(|p| p.backend_name()))
            .finish()
    }
}

impl Connections {
    /// The live database handle, if a database was requested.
    pub fn database(&self) -> Option<&Arc<dyn DatabaseHandle>> {
        self.database.as_ref()
    }

    /// The live producer, if a producer was requested.
    pub fn producer(&self) -> Option<&Arc<dyn Producer>> {
        self.producer.as_ref()
    }

    /// Publish a message through the producer handle.
    pub async fn publish(&self, topic: &str, message: &str) -> Result<()> {
        match &self.producer {
            Some(producer) => producer.publish(topic, message).await,
            None => Err(WireupError::Producer("no producer connected".to_string())),
        }
    }

    /// Close every populated handle concurrently.
    ///
    /// If several closes fail, the first error observed wins and the rest
    /// are logged and dropped.
    pub async fn close(&self) -> Result<()> {
        let errors = Arc::new(ErrorSink::default());
        let mut tasks = Vec::new();
        if let Some(handle) = &self.database {
            let handle = Arc::clone(handle);
            let errors = Arc::clone(&errors);
            tasks.push(tokio::spawn(async move {
                if let Err(err) = handle.close().await {
                    errors.record(err);
                }
            }));
        }
        if let Some(producer) = &self.producer {
            let producer = Arc::clone(producer);
            let errors = Arc::clone(&errors);
            tasks.push(tokio::spawn(async move {
                if let Err(err) = producer.close().await {
                    errors.record(err);
                }
            }));
        }
        for task in tasks {
            task.await.map_err(task_panic)?;
        }
        match errors.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn task_panic(err: tokio::task::JoinError) -> WireupError {
    WireupError::Internal(format!("connection task failed: {err}"))
}

/// First-error-wins aggregator shared by concurrent tasks.
///
/// The mutex guards the "have we already recorded?" check; later errors are
/// logged at debug level and dropped.
#[derive(Default)]
struct ErrorSink {
    first: Mutex<Option<WireupError>>,
}

impl ErrorSink {
    fn record(&self, err: WireupError) {
        let mut slot = self.first.lock();
        if slot.is_none() {
            *slot = Some(err);
        } else {
            tracing::debug!(error = %err, "discarding error recorded after the first");
        }
    }

    fn take(&self) -> Option<WireupError> {
        self.first.lock().take()
    }
}
