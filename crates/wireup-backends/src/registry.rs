//! Backend registry for managing available connection backends

use std::collections::HashMap;
use std::sync::Arc;
use wireup_core::{DatabaseBackend, ProducerBackend};

/// Registry of available database and producer backends.
///
/// The registry is populated once at startup and read-only afterwards;
/// there is no unregister operation. Lookups take `&self` and are safe for
/// concurrent readers once registration has completed, which is why the
/// opener takes the registry behind an `Arc`.
///
/// Registering two backends under the same type name is a wiring defect,
/// not a runtime condition, and panics.
pub struct BackendRegistry {
    databases: HashMap<String, Arc<dyn DatabaseBackend>>,
    producers: HashMap<String, Arc<dyn ProducerBackend>>,
}

impl BackendRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            databases: HashMap::new(),
            producers: HashMap::new(),
        }
    }

    /// Create a registry with all built-in backends registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Databases
        #[cfg(feature = "postgres")]
        registry.register_database(Arc::new(crate::postgres::PostgresBackend::new()));
        #[cfg(feature = "sqlite")]
        registry.register_database(Arc::new(crate::sqlite::SqliteBackend::new()));

        // Producers
        #[cfg(feature = "dummy")]
        registry.register_producer(Arc::new(crate::dummy::DummyBackend::new()));
        #[cfg(feature = "kafka")]
        registry.register_producer(Arc::new(crate::kafka::KafkaBackend::new()));

        registry
    }

    /// Register a database backend.
    ///
    /// # Panics
    ///
    /// Panics if a backend is already registered under the same name.
    pub fn register_database(&mut self, backend: Arc<dyn DatabaseBackend>) {
        let name = backend.name().to_string();
        tracing::info!(backend = %name, "registering database backend");
        if self.databases.insert(name.clone(), backend).is_some() {
            panic!("wireup: database backend {name:?} registered twice");
        }
    }

    /// Register a producer backend.
    ///
    /// # Panics
    ///
    /// Panics if a backend is already registered under the same name.
    pub fn register_producer(&mut self, backend: Arc<dyn ProducerBackend>) {
        let name = backend.name().to_string();
        tracing::info!(backend = %name, "registering producer backend");
        if self.producers.insert(name.clone(), backend).is_some() {
            panic!("wireup: producer backend {name:?} registered twice");
        }
    }

    /// Get a database backend by type name
    pub fn database(&self, name: &str) -> Option<Arc<dyn DatabaseBackend>> {
        let backend = self.databases.get(name).cloned();
        if backend.is_none() {
            tracing::warn!(backend = %name, "database backend not found in registry");
        }
        backend
    }

    /// Get a producer backend by type name
    pub fn producer(&self, name: &str) -> Option<Arc<dyn ProducerBackend>> {
        let backend = self.producers.get(name).cloned();
        if backend.is_none() {
            tracing::warn!(backend = %name, "producer backend not found in registry");
        }
        backend
    }

    /// Check if a database backend is registered
    pub fn has_database(&self, name: &str) -> bool {
        self.databases.contains_key(name)
    }

    /// Check if a producer backend is registered
    pub fn has_producer(&self, name: &str) -> bool {
        self.producers.contains_key(name)
    }

    /// List all registered database backend names
    pub fn list_databases(&self) -> Vec<&str> {
        self.databases.keys().map(|s| s.as_str()).collect()
    }

    /// List all registered producer backend names
    pub fn list_producers(&self) -> Vec<&str> {
        self.producers.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use wireup_core::{DatabaseConfig, DatabaseHandle, Result, WireupError};

    struct FakeBackend;

    #[async_trait]
    impl DatabaseBackend for FakeBackend {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn validate(&self, _config: &DatabaseConfig) -> Result<()> {
            Ok(())
        }

        async fn connect(&self, _config: &DatabaseConfig) -> Result<Arc<dyn DatabaseHandle>> {
            Err(WireupError::Connection("fake backend".to_string()))
        }
    }

    #[test]
    fn test_lookup_of_unregistered_name_is_none() {
        let registry = BackendRegistry::new();
        assert!(registry.database("nope").is_none());
        assert!(registry.producer("nope").is_none());
        assert!(!registry.has_database("nope"));
    }

    #[test]
    fn test_registered_backend_is_found() {
        let mut registry = BackendRegistry::new();
        registry.register_database(Arc::new(FakeBackend));
        assert!(registry.has_database("fake"));
        assert_eq!(registry.list_databases(), vec!["fake"]);
        assert_eq!(registry.database("fake").unwrap().name(), "fake");
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_registration_panics() {
        let mut registry = BackendRegistry::new();
        registry.register_database(Arc::new(FakeBackend));
        registry.register_database(Arc::new(FakeBackend));
    }

    #[test]
    fn test_with_defaults_registers_built_in_backends() {
        let registry = BackendRegistry::with_defaults();
        #[cfg(feature = "postgres")]
        assert!(registry.has_database("postgres"));
        #[cfg(feature = "sqlite")]
        assert!(registry.has_database("sqlite"));
        #[cfg(feature = "dummy")]
        assert!(registry.has_producer("dummy"));
    }
}
