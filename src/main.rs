//! cytoscape-mcp — MCP server for Cytoscape Desktop.
//!
//! Usage:
//!   cytoscape-mcp [serve]     Serve MCP over stdio (default)
//!   cytoscape-mcp tools       Print the tool catalogue as JSON
//!   cytoscape-mcp ping        Check that Cytoscape is reachable
//!   cytoscape-mcp config      Print the effective configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use cytoscape_mcp::config::{self, CytoscapeConfig};
use cytoscape_mcp::cyrest::{CyRestClient, CytoscapeApi};
use cytoscape_mcp::server::McpServer;
use cytoscape_mcp::tools::Dispatcher;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "cytoscape-mcp")]
#[command(version)]
#[command(about = "MCP server exposing Cytoscape Desktop as tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the config file.
    #[arg(long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve MCP over stdio.
    Serve,

    /// Print the tool catalogue as JSON.
    Tools,

    /// Check that Cytoscape is reachable.
    Ping,

    /// Print the effective configuration.
    Config,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => PathBuf::from(shellexpand::tilde(path).into_owned()),
        None => config::default_config_path(),
    };
    let mut cfg = config::load_effective_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(level) = &cli.log_level {
        cfg.log_level = level.clone();
    }

    init_logging(&cfg)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cmd_serve(cfg).await,
        Commands::Tools => cmd_tools(&cfg),
        Commands::Ping => cmd_ping(&cfg).await,
        Commands::Config => cmd_config(&cfg),
    }
}

/// Logs go to stderr or a file; stdout carries the protocol.
fn init_logging(cfg: &CytoscapeConfig) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level));

    match cfg.resolved_log_file() {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

async fn cmd_serve(cfg: CytoscapeConfig) -> Result<()> {
    info!("Starting cytoscape-mcp against {}", cfg.base_url());
    let client = CyRestClient::new(&cfg).context("Failed to build CyREST client")?;

    match client.version_info().await {
        Ok(version) => info!(
            "Cytoscape {} reachable (CyREST {})",
            version.cytoscape_version, version.api_version
        ),
        Err(e) => {
            warn!("Cytoscape connection test failed: {}", e);
            warn!("Make sure Cytoscape Desktop is running");
        }
    }

    let dispatcher = Arc::new(Dispatcher::new(Arc::new(client), &cfg.ndex_url));
    let server = Arc::new(McpServer::new(dispatcher));

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            signal_cancel.cancel();
        }
    });

    server
        .serve(tokio::io::stdin(), tokio::io::stdout(), cancel)
        .await?;
    info!("Server exited normally");
    Ok(())
}

fn cmd_tools(cfg: &CytoscapeConfig) -> Result<()> {
    let client = CyRestClient::new(cfg)?;
    let dispatcher = Dispatcher::new(Arc::new(client), &cfg.ndex_url);
    let listing = serde_json::to_string_pretty(&dispatcher.tool_definitions())?;
    println!("{}", listing);
    Ok(())
}

async fn cmd_ping(cfg: &CytoscapeConfig) -> Result<()> {
    let client = CyRestClient::new(cfg)?;
    match client.version_info().await {
        Ok(version) => {
            println!(
                "{} Cytoscape {} at {} (CyREST {})",
                "OK".green().bold(),
                version.cytoscape_version,
                cfg.base_url(),
                version.api_version,
            );
            Ok(())
        }
        Err(e) => {
            eprintln!(
                "{} Cytoscape not accessible at {}: {}",
                "Error:".red().bold(),
                cfg.base_url(),
                e
            );
            std::process::exit(1);
        }
    }
}

fn cmd_config(cfg: &CytoscapeConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(cfg).context("Failed to serialize config")?;
    println!("{}", rendered.trim_end());
    Ok(())
}
