//! Screen Reader MCP Server
//!
//! This binary implements the Model Context Protocol (MCP) server, letting an
//! agent client read the text currently visible on screen.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use screen_reader_mcp::mcp::session;
use screen_reader_mcp::ocr::CommandReader;
use screen_reader_mcp::{Config, McpServer, logging};

#[derive(Parser)]
#[command(name = "screen-reader-mcp")]
#[command(about = "MCP stdio server exposing the read_screen_text tool")]
#[command(version)]
struct Args {
    /// Path to config file (defaults to ~/.screen-reader-mcp/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref())?;
    logging::init(&config.log.filter);

    info!("screen-reader-mcp {} starting", env!("CARGO_PKG_VERSION"));
    let reader = CommandReader::from_config(&config.ocr);
    let server = McpServer::new(reader, &config);

    session::serve_stdio(&server)
        .await
        .context("MCP session ended with an I/O error")?;

    Ok(())
}
