use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use screen_reader_mcp::mcp::{session, tools};
use screen_reader_mcp::ocr::{CommandReader, FixedReader, ScreenReader};
use screen_reader_mcp::{Config, McpServer, logging};

#[derive(Parser)]
#[command(name = "screen-reader")]
#[command(about = "Read the text visible on screen, standalone or as an MCP server")]
#[command(version)]
struct Cli {
    /// Path to config file (defaults to ~/.screen-reader-mcp/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server on stdin/stdout
    Serve {
        /// Answer every read_screen_text call with this text instead of OCR
        #[arg(long)]
        fixed_text: Option<String>,
    },

    /// Read the screen once and print the text
    Read {
        /// Print the recognizer output as-is and fail on OCR errors
        #[arg(long)]
        raw: bool,
    },

    /// Print the MCP tool definitions as JSON
    Tools,

    /// Write the default config file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;
    logging::init(&config.log.filter);

    match cli.command {
        Commands::Serve { fixed_text } => match fixed_text {
            Some(text) => serve(McpServer::new(FixedReader::new(text), &config)).await?,
            None => {
                let reader = CommandReader::from_config(&config.ocr);
                serve(McpServer::new(reader, &config)).await?
            }
        },

        Commands::Read { raw } => {
            run_read(&config, raw).await?;
        }

        Commands::Tools => {
            println!("{}", serde_json::to_string_pretty(&tools::tool_definitions())?);
        }

        Commands::Init => {
            let path = match cli.config {
                Some(path) => path,
                None => Config::config_path()?,
            };
            init_config(&path)?;
        }
    }

    Ok(())
}

async fn serve<R: ScreenReader>(server: McpServer<R>) -> Result<()> {
    session::serve_stdio(&server)
        .await
        .context("MCP session ended with an I/O error")?;
    Ok(())
}

async fn run_read(config: &Config, raw: bool) -> Result<()> {
    let reader = CommandReader::from_config(&config.ocr);

    if raw {
        let text = reader
            .try_recognize()
            .await
            .context("Screen text recognition failed")?;
        print!("{}", text);
        return Ok(());
    }

    eprintln!("{}", "🔍 Reading screen...".cyan());
    let server = McpServer::new(reader, config);
    println!("{}", server.read_screen_text().await);

    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("{} {}", "Config already exists:".yellow(), path.display());
        return Ok(());
    }

    Config::default().save_to(path)?;
    println!("✓ Created {}", path.display());

    println!("\nNext steps:");
    println!("  screen-reader read            # check capture + OCR work");
    println!("  screen-reader-mcp             # register this command with your MCP client");

    Ok(())
}
