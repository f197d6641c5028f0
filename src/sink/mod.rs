use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

pub mod console;
pub mod http;
pub mod memory;

pub use console::ConsoleSink;
pub use http::HttpSink;
pub use memory::MemorySink;

/// Failure to hand encoded output to one sink.
///
/// A delivery error never invalidates the output itself; other sinks are
/// still attempted.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP delivery failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A destination for encoded SenML output.
#[async_trait]
pub trait Sink: Send + Sync + Debug {
    /// Name used in logs and delivery reports
    fn name(&self) -> &str;

    /// Delivers one encoded payload. Not retried on failure.
    async fn deliver(&self, payload: &[u8]) -> Result<(), DeliveryError>;
}
