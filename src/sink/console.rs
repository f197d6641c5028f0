use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::{DeliveryError, Sink};

/// Prints the output to stdout, unchanged.
#[derive(Clone, Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn deliver(&self, payload: &[u8]) -> Result<(), DeliveryError> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(payload).await?;
        stdout.flush().await?;
        Ok(())
    }
}
