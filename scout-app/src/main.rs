use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use scout_common::observability::{init_logging, LogConfig};
use scout_config::{ScoutConfig, ScoutConfigLoader};
use tokio::net::TcpListener;

use services::Services;
use tools::ToolRegistry;

mod http;
mod params;
mod services;
mod tools;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Http,
    Stdio,
}

#[derive(Debug, Parser)]
#[command(name = "webscout", about = "Web search, extraction and download services")]
struct Cli {
    /// Transport front to run.
    #[arg(short, long, value_enum, default_value_t = Mode::Stdio)]
    mode: Mode,

    /// Listen port for http mode; overrides the config file.
    #[arg(short, long)]
    port: Option<u16>,

    /// Comma-separated tool names for the stdio front. Unset means all.
    #[arg(short, long)]
    tools: Option<String>,

    /// Configuration file (YAML); may be absent.
    #[arg(short, long, default_value = "webscout.yaml")]
    config: PathBuf,

    /// Default log filter when RUST_LOG is unset.
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config: ScoutConfig = ScoutConfigLoader::new().with_file(&cli.config).load()?;

    let log_path = init_logging(LogConfig {
        // In stdio mode stdout is the protocol channel and stderr carries
        // nothing; logs go to the rolling file only.
        emit_stderr: matches!(cli.mode, Mode::Http),
        default_filter: static_filter(&cli.log_level),
        ..Default::default()
    })?;
    tracing::info!(mode = ?cli.mode, log = %log_path.display(), "starting");

    // Resolved up front so a bad --tools value fails before anything binds.
    let registry = match &cli.tools {
        Some(spec) => ToolRegistry::from_names(spec)?,
        None => ToolRegistry::with_all(),
    };

    let services = Arc::new(Services::build(&config)?);

    match cli.mode {
        Mode::Http => serve_http(services, &config, cli.port).await,
        Mode::Stdio => tools::run_stdio(services, registry).await,
    }
}

async fn serve_http(
    services: Arc<Services>,
    config: &ScoutConfig,
    port_override: Option<u16>,
) -> Result<()> {
    let port = port_override.unwrap_or(config.server.port);
    let addr = format!("{}:{}", config.server.bind_addr, port);

    let app = http::build_router(services);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn static_filter(level: &str) -> &'static str {
    match level {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    }
}
