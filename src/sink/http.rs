use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use senml_core::format::SENML_JSON_CONTENT_TYPE;

use super::{DeliveryError, Sink};

/// POSTs the output to a fixed URL as `application/senml+json`.
///
/// Non-2xx responses count as failed deliveries. There is no timeout
/// unless one is set with [`HttpSink::with_timeout`].
#[derive(Clone, Debug)]
pub struct HttpSink {
    url: String,
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpSink {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            timeout: None,
        }
    }

    /// Bound the time a single POST may take
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Sink for HttpSink {
    fn name(&self) -> &str {
        &self.url
    }

    async fn deliver(&self, payload: &[u8]) -> Result<(), DeliveryError> {
        tracing::debug!(url = %self.url, bytes = payload.len(), "posting SenML output");

        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, SENML_JSON_CONTENT_TYPE)
            .body(payload.to_vec());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        response.error_for_status()?;

        Ok(())
    }
}
