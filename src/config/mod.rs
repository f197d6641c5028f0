use std::time::Duration;

use senml_core::{Format, OutputOptions};

use crate::sink::{ConsoleSink, HttpSink, Sink};

#[derive(Clone, Debug)]
pub struct Config {
    /// Format of the input bytes
    pub input: Format,

    /// Format of the output bytes
    pub output: Format,

    /// Validate and resolve base fields before encoding
    pub expand: bool,

    /// Encoder settings (pretty printing, line protocol series name)
    pub output_options: OutputOptions,

    /// Print the output to stdout
    pub print: bool,

    /// URL to HTTP POST the output to
    pub post_url: Option<String>,

    /// Optional deadline for the HTTP POST
    pub post_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: Format::Json,
            output: Format::Json,
            expand: false,
            output_options: OutputOptions::default(),
            print: false,
            post_url: None,
            post_timeout: None,
        }
    }
}

impl Config {
    /// Build the delivery sinks this configuration asks for, console first
    pub fn sinks(&self) -> Vec<Box<dyn Sink>> {
        let mut sinks: Vec<Box<dyn Sink>> = Vec::new();

        if self.print {
            sinks.push(Box::new(ConsoleSink::new()));
        }

        if let Some(url) = &self.post_url {
            let mut sink = HttpSink::new(url.clone());
            if let Some(timeout) = self.post_timeout {
                sink = sink.with_timeout(timeout);
            }
            sinks.push(Box::new(sink));
        }

        sinks
    }
}
