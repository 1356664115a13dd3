//! Kafka producer backend
//!
//! Wraps an rdkafka `FutureProducer`. Broker addresses come from the
//! configured `hosts` list; the driver-level send retry count comes from
//! `retries`. Requires the non-default `kafka` cargo feature.

use async_trait::async_trait;
use rdkafka::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer as _};
use rdkafka::util::Timeout;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use wireup_core::{Producer, ProducerBackend, ProducerConfig, Result, WireupError};

const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Kafka producer backend
pub struct KafkaBackend;

impl KafkaBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for KafkaBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProducerBackend for KafkaBackend {
    fn name(&self) -> &'static str {
        "kafka"
    }

    fn validate(&self, config: &ProducerConfig) -> Result<()> {
        if config.hosts.is_empty() {
            return Err(WireupError::Configuration(
                "kafka: no broker hosts in configuration".to_string(),
            ));
        }
        Ok(())
    }

    async fn connect(&self, config: &ProducerConfig) -> Result<Arc<dyn Producer>> {
        let brokers = config
            .hosts
            .iter()
            .map(|host| host.address())
            .collect::<Vec<_>>()
            .join(",");
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers.as_str())
            .set("message.send.max.retries", config.retries.max(0).to_string())
            .set("acks", "all")
            .create()
            .map_err(|err| WireupError::Producer(err.to_string()))?;
        tracing::debug!(brokers = %brokers, "created kafka producer");
        Ok(Arc::new(KafkaProducer { producer }))
    }
}

/// Producer publishing to a Kafka cluster
pub struct KafkaProducer {
    producer: FutureProducer,
}

#[async_trait]
impl Producer for KafkaProducer {
    fn backend_name(&self) -> &'static str {
        "kafka"
    }

    async fn publish(&self, topic: &str, message: &str) -> Result<()> {
        let key = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string();
        let record = FutureRecord::to(topic).key(&key).payload(message);
        self.producer
            .send(record, Timeout::Never)
            .await
            .map_err(|(err, _)| WireupError::Producer(err.to_string()))?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.producer
            .flush(Timeout::After(FLUSH_TIMEOUT))
            .map_err(|err| WireupError::Producer(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wireup_core::BrokerAddr;

    #[test]
    fn test_validate_requires_hosts() {
        let backend = KafkaBackend::new();
        let mut config = ProducerConfig {
            backend: "kafka".to_string(),
            retries: 3,
            hosts: Vec::new(),
        };
        assert!(backend.validate(&config).is_err());

        config.hosts.push(BrokerAddr {
            host: "broker-1".to_string(),
            port: 9092,
        });
        assert!(backend.validate(&config).is_ok());
    }
}
