//! # senmlcat
//!
//! Converts SenML packs between wire formats, optionally expanding them into
//! self-contained records first, and delivers the result to the console or
//! an HTTP endpoint.
//!
//! ```rust
//! use senmlcat::{Config, Format, Pipeline};
//!
//! let config = Config {
//!     output: Format::Csv,
//!     expand: true,
//!     ..Default::default()
//! };
//! let csv = Pipeline::without_sinks(config)
//!     .convert(br#"[{"bn":"dev1/","bu":"Cel","n":"temp","v":21.5}]"#)
//!     .unwrap();
//! assert_eq!(csv, b"dev1/temp,,Cel,21.5,,,,\n");
//! ```

pub mod config;
pub mod pipeline;
pub mod sink;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;
pub use pipeline::{Delivery, Pipeline, PipelineError, RunReport, Stage};
pub use sink::{ConsoleSink, DeliveryError, HttpSink, MemorySink, Sink};

// Re-export the SenML model and codecs
pub use senml_core::{
    Format, OutputOptions, SenMLBuilder, SenMLError, SenMLPack, SenMLRecord, ValidationError,
};
