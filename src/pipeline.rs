//! The conversion pipeline: decode, optionally validate and resolve, encode,
//! then deliver to every configured sink.
//!
//! Decoding, validation, resolution and encoding are fatal: any failure ends
//! the conversion without output. Delivery is best effort and reported per
//! sink.

use futures::future::join_all;
use senml_core::{Format, SenMLError, SenMLPack, ValidationError};
use thiserror::Error;

use crate::config::Config;
use crate::sink::{DeliveryError, Sink};

/// Where a conversion is, or where it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Decoding,
    Validating,
    Resolving,
    Encoding,
    Delivering,
    Done,
    Failed,
}

/// A conversion failure. No output is produced once one of these occurs.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("decode of {format} input failed")]
    Decode {
        format: Format,
        #[source]
        source: SenMLError,
    },

    #[error("input is not a valid SenML pack ({} problems)", .errors.len())]
    InvalidInput { errors: Vec<ValidationError> },

    #[error("resolving base fields failed")]
    Resolve(#[source] SenMLError),

    #[error("encode of {format} output failed")]
    Encode {
        format: Format,
        #[source]
        source: SenMLError,
    },
}

impl PipelineError {
    /// The stage the conversion failed in
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Decode { .. } => Stage::Decoding,
            PipelineError::InvalidInput { .. } => Stage::Validating,
            PipelineError::Resolve(_) => Stage::Resolving,
            PipelineError::Encode { .. } => Stage::Encoding,
        }
    }
}

/// Outcome of delivering the output to one sink
#[derive(Debug)]
pub struct Delivery {
    pub sink: String,
    pub result: Result<(), DeliveryError>,
}

/// Output of a completed conversion and the fate of each delivery
#[derive(Debug)]
pub struct RunReport {
    pub output: Vec<u8>,
    pub deliveries: Vec<Delivery>,
}

impl RunReport {
    /// True if every sink accepted the output
    pub fn all_delivered(&self) -> bool {
        self.deliveries.iter().all(|d| d.result.is_ok())
    }

    /// Deliveries that failed
    pub fn failures(&self) -> impl Iterator<Item = &Delivery> {
        self.deliveries.iter().filter(|d| d.result.is_err())
    }
}

/// Converts packs according to a [`Config`] and hands the result to sinks.
///
/// A pipeline holds no per-conversion state; one instance can serve any
/// number of independent conversions, including concurrent ones.
#[derive(Debug)]
pub struct Pipeline {
    config: Config,
    sinks: Vec<Box<dyn Sink>>,
}

impl Pipeline {
    /// Create a pipeline with the sinks `config` asks for
    pub fn new(config: Config) -> Self {
        let sinks = config.sinks();
        Self { config, sinks }
    }

    /// Create a pipeline that delivers nowhere
    pub fn without_sinks(config: Config) -> Self {
        Self {
            config,
            sinks: Vec::new(),
        }
    }

    /// Add a delivery sink
    pub fn with_sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run decode, the optional validate/resolve step and encode.
    pub fn convert(&self, raw: &[u8]) -> Result<Vec<u8>, PipelineError> {
        tracing::debug!(stage = ?Stage::Idle, bytes = raw.len(), "conversion started");

        let result = self.convert_inner(raw);
        match &result {
            Ok(output) => tracing::debug!(bytes = output.len(), "conversion complete"),
            Err(e) => {
                enter(Stage::Failed);
                tracing::debug!(failed_in = ?e.stage(), error = %e, "conversion failed");
            }
        }
        result
    }

    fn convert_inner(&self, raw: &[u8]) -> Result<Vec<u8>, PipelineError> {
        let input = self.config.input;
        let output = self.config.output;

        enter(Stage::Decoding);
        let mut pack = senml_core::decode(raw, input).map_err(|source| PipelineError::Decode {
            format: input,
            source,
        })?;

        if self.config.expand {
            pack = expand(&pack)?;
        }

        enter(Stage::Encoding);
        senml_core::encode(&pack, output, &self.config.output_options).map_err(|source| {
            PipelineError::Encode {
                format: output,
                source,
            }
        })
    }

    /// Hand `output` to every sink. Sinks run concurrently and independently.
    pub async fn deliver(&self, output: &[u8]) -> Vec<Delivery> {
        enter(Stage::Delivering);

        let deliveries = self.sinks.iter().map(|sink| async move {
            let result = sink.deliver(output).await;
            if let Err(e) = &result {
                tracing::warn!(sink = sink.name(), error = %e, "delivery failed");
            }
            Delivery {
                sink: sink.name().to_string(),
                result,
            }
        });

        join_all(deliveries).await
    }

    /// Convert `raw` and deliver the result to every sink.
    pub async fn run(&self, raw: &[u8]) -> Result<RunReport, PipelineError> {
        let output = self.convert(raw)?;
        let deliveries = self.deliver(&output).await;
        enter(Stage::Done);

        Ok(RunReport { output, deliveries })
    }
}

/// Validate `pack` and resolve its base fields.
pub fn expand(pack: &SenMLPack) -> Result<SenMLPack, PipelineError> {
    enter(Stage::Validating);
    let errors = senml_core::validate(pack);
    if !errors.is_empty() {
        return Err(PipelineError::InvalidInput { errors });
    }

    enter(Stage::Resolving);
    senml_core::resolve(pack).map_err(PipelineError::Resolve)
}

fn enter(stage: Stage) {
    tracing::debug!(?stage, "pipeline stage");
}
