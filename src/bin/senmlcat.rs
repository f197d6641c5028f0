use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use senmlcat::{Config, Format, OutputOptions, Pipeline, PipelineError};

#[derive(Parser, Debug)]
#[command(
    name = "senmlcat",
    version,
    about = "Convert SenML between JSON, CBOR, XML, MessagePack, CSV and line protocol"
)]
struct Cli {
    /// SenML file to read
    input: PathBuf,

    /// Input format: json, cbor, xml or mpack
    #[arg(short = 'f', long = "from", default_value = "json")]
    from: Format,

    /// Output format: json, cbor, xml, csv, mpack or linp
    #[arg(short = 't', long = "to", default_value = "json")]
    to: Format,

    /// Validate and expand base fields into self-contained records
    #[arg(long)]
    expand: bool,

    /// Indent output where the format supports it
    #[arg(short = 'i', long)]
    indent: bool,

    /// Print output to stdout
    #[arg(long)]
    print: bool,

    /// URL to HTTP POST output to
    #[arg(long, value_name = "URL")]
    post: Option<String>,

    /// Seconds to wait for the HTTP POST before giving up
    #[arg(long, value_name = "SECS")]
    post_timeout: Option<u64>,

    /// InfluxDB series name for line protocol output
    #[arg(long, default_value = "senml")]
    topic: String,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            input: cli.from,
            output: cli.to,
            expand: cli.expand,
            output_options: OutputOptions {
                pretty: cli.indent,
                topic: cli.topic,
            },
            print: cli.print,
            post_url: cli.post,
            post_timeout: cli.post_timeout.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !cli.from.can_decode() {
        bail!("{} is an output-only format", cli.from);
    }

    let input = tokio::fs::read(&cli.input)
        .await
        .with_context(|| format!("error reading SenML file {}", cli.input.display()))?;

    let pipeline = Pipeline::new(cli.into());
    let report = match pipeline.run(&input).await {
        Ok(report) => report,
        Err(PipelineError::InvalidInput { errors }) => {
            for error in &errors {
                tracing::error!("{error}");
            }
            bail!("input is not a valid SenML pack ({} problems)", errors.len());
        }
        Err(e) => return Err(e).context("conversion of SenML failed"),
    };

    let failed = report.failures().count();
    if failed > 0 {
        bail!(
            "output of SenML failed for {failed} of {} destinations",
            report.deliveries.len()
        );
    }

    tracing::info!(bytes = report.output.len(), "SenML converted");
    Ok(())
}
