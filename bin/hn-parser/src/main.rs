//! # hn-parser Binary
//!
//! Parses a snapshot file from the command line, or serves the HTTP API.

mod summary;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use configs::{LogFormat, LogSettings, Settings};
use hn_core::{Engine, ErrorKind, ParseError, SchemaVersion};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Forum snapshot parser.
#[derive(Parser, Debug)]
#[command(name = "hn-parser")]
#[command(about = "Validate and normalize HackerNews snapshot documents")]
#[command(version)]
struct Cli {
    /// Path to a TOML settings file.
    #[arg(short, long, env = "HN_PARSER_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a snapshot file and print the dataset.
    Parse {
        /// JSON document to parse.
        #[arg(short, long)]
        file: PathBuf,

        /// Force a schema; the document must declare the same version.
        #[arg(short, long, value_enum)]
        schema: Option<SchemaArg>,

        /// Print a human-readable summary instead of JSON.
        #[arg(long)]
        summary: bool,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Start the HTTP API.
    Serve {
        /// Overrides `server.host`.
        #[arg(long)]
        host: Option<String>,

        /// Overrides `server.port`.
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemaArg {
    #[value(name = "1.0", alias = "1")]
    V1,
    #[value(name = "2.0", alias = "2")]
    V2,
}

impl From<SchemaArg> for SchemaVersion {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::V1 => SchemaVersion::V1,
            SchemaArg::V2 => SchemaVersion::V2,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    init_tracing(&settings.log)?;

    match cli.command {
        Commands::Parse {
            file,
            schema,
            summary,
            pretty,
        } => {
            let engine = Engine::with_downgrade(settings.parser.downgrade);
            parse_file(&engine, &file, schema.map(Into::into), summary, pretty)
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            serve(settings).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(log: &LogSettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .with_context(|| format!("invalid log level {:?}", log.level))?;

    // Logs go to stderr so `parse` output stays pipeable.
    let (json, pretty) = match log.format {
        LogFormat::Json => (
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Pretty => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .try_init()
        .context("installing tracing subscriber")
}

fn parse_file(
    engine: &Engine,
    file: &Path,
    requested: Option<SchemaVersion>,
    summary: bool,
    pretty: bool,
) -> anyhow::Result<ExitCode> {
    let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;

    let dataset = match engine.parse_slice(&bytes, requested) {
        Ok(dataset) => dataset,
        Err(err) => {
            info!(file = %file.display(), kind = %err.kind(), "Rejected snapshot");
            eprintln!("{}", serde_json::to_string_pretty(&err.payload())?);
            return Ok(exit_code_for(&err));
        }
    };

    if summary {
        print!("{}", summary::render(&dataset));
    } else if pretty {
        println!("{}", serde_json::to_string_pretty(&dataset)?);
    } else {
        println!("{}", serde_json::to_string(&dataset)?);
    }
    Ok(ExitCode::SUCCESS)
}

fn exit_code_for(err: &ParseError) -> ExitCode {
    match err.kind() {
        ErrorKind::MalformedInput | ErrorKind::Validation => ExitCode::from(2),
        ErrorKind::UnsupportedVersion | ErrorKind::VersionMismatch => ExitCode::from(3),
    }
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let engine = Engine::with_downgrade(settings.parser.downgrade);
    let state = Arc::new(hn_api::AppState::new(engine, settings.server.max_body_bytes));
    let app = hn_api::configure_routes(state);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!("hn-parser API listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("hn-parser API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn schema_accepts_short_aliases() {
        let cli = Cli::try_parse_from(["hn-parser", "parse", "--file", "x.json", "--schema", "2"]).unwrap();
        match cli.command {
            Commands::Parse { schema, .. } => {
                assert_eq!(schema.map(SchemaVersion::from), Some(SchemaVersion::V2));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_schema_is_rejected_by_the_cli() {
        assert!(Cli::try_parse_from(["hn-parser", "parse", "--file", "x.json", "--schema", "3.0"]).is_err());
    }

    #[test]
    fn error_kinds_map_to_distinct_exit_codes() {
        let mismatch = ParseError::VersionMismatch {
            requested: SchemaVersion::V2,
            declared: SchemaVersion::V1,
        };
        let invalid = ParseError::validation("stories", "missing required field");
        assert_eq!(exit_code_for(&mismatch), ExitCode::from(3));
        assert_eq!(exit_code_for(&invalid), ExitCode::from(2));
    }
}
