//! Consumer configuration

/// Consumer-group read settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConsumerConfig {
    /// Stream key to read from
    pub stream_key: String,
    /// Consumer group name; created on connect if missing
    pub group: String,
    /// Consumer name within the group; reused across restarts so this
    /// consumer's pending entries are read again on connect
    pub consumer: String,
    /// How long one read blocks waiting for a message
    pub block_ms: u64,
    /// Pending entries idle at least this long on any consumer are
    /// claimed by this one on connect
    pub claim_idle_ms: u64,
}

impl Default for StreamConsumerConfig {
    fn default() -> Self {
        Self {
            stream_key: "system.audit".to_string(),
            group: "audit-service-group".to_string(),
            consumer: "audit-service".to_string(),
            block_ms: 5000,
            claim_idle_ms: 60_000,
        }
    }
}

impl From<&audit_common::StreamConfig> for StreamConsumerConfig {
    fn from(config: &audit_common::StreamConfig) -> Self {
        Self {
            stream_key: config.stream_key.clone(),
            group: config.group.clone(),
            consumer: config.consumer.clone(),
            block_ms: config.block_ms,
            claim_idle_ms: config.claim_idle_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StreamConsumerConfig::default();
        assert_eq!(config.stream_key, "system.audit");
        assert_eq!(config.group, "audit-service-group");
        assert_eq!(config.consumer, "audit-service");
        assert_eq!(config.block_ms, 5000);
        assert_eq!(config.claim_idle_ms, 60_000);
    }

    #[test]
    fn test_default_consumer_is_stable() {
        assert_eq!(
            StreamConsumerConfig::default().consumer,
            StreamConsumerConfig::default().consumer
        );
    }
}
