use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DeliveryError, Sink};

/// A sink that keeps every delivered payload in memory.
///
/// Clones share the same storage, so a clone can be handed to a pipeline
/// while the original is used to inspect what was delivered.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    deliveries: Arc<RwLock<Vec<Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads delivered so far, oldest first
    pub async fn deliveries(&self) -> Vec<Vec<u8>> {
        self.deliveries.read().await.clone()
    }
}

#[async_trait]
impl Sink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn deliver(&self, payload: &[u8]) -> Result<(), DeliveryError> {
        self.deliveries.write().await.push(payload.to_vec());
        Ok(())
    }
}
