//! No-op producer backend
//!
//! Accepts any configuration and logs published messages instead of
//! delivering them anywhere. Useful in development and as the safe default
//! when no broker is available.

use async_trait::async_trait;
use std::sync::Arc;
use wireup_core::{Producer, ProducerBackend, ProducerConfig, Result};

/// Producer backend that swallows everything it is given
pub struct DummyBackend;

impl DummyBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProducerBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "dummy"
    }

    fn validate(&self, _config: &ProducerConfig) -> Result<()> {
        Ok(())
    }

    async fn connect(&self, _config: &ProducerConfig) -> Result<Arc<dyn Producer>> {
        Ok(Arc::new(DummyProducer))
    }
}

/// Producer that logs instead of publishing
pub struct DummyProducer;

#[async_trait]
impl Producer for DummyProducer {
    fn backend_name(&self) -> &'static str {
        "dummy"
    }

    async fn publish(&self, topic: &str, message: &str) -> Result<()> {
        tracing::info!(topic = %topic, message = %message, "publish");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wireup_core::ProducerConfig;

    fn config() -> ProducerConfig {
        ProducerConfig {
            backend: "dummy".to_string(),
            retries: 0,
            hosts: Vec::new(),
        }
    }

    #[test]
    fn test_validate_accepts_anything() {
        assert!(DummyBackend::new().validate(&config()).is_ok());
    }

    #[tokio::test]
    async fn test_publish_and_close_succeed() {
        let producer = DummyBackend::new().connect(&config()).await.unwrap();
        producer.publish("events", "hello").await.unwrap();
        producer.close().await.unwrap();
        assert_eq!(producer.backend_name(), "dummy");
    }
}
