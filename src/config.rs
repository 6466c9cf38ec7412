use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Reported as `serverInfo.name` during `initialize`
    #[serde(default = "default_server_name")]
    pub name: String,
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            protocol_version: default_protocol_version(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Program and arguments that capture the display. `{image}` is replaced
    /// by the path the image must be written to.
    #[serde(default = "default_capture_command")]
    pub capture: Vec<String>,
    /// Program and arguments that print the text found in `{image}`
    #[serde(default = "default_recognize_command")]
    pub recognize: Vec<String>,
    /// Upper bound for one capture + recognition run. Unset waits forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            capture: default_capture_command(),
            recognize: default_recognize_command(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Character budget for the transcript returned to the client
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive; `RUST_LOG` wins when set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

// Default value functions
fn default_server_name() -> String {
    "screen-reader".to_string()
}

fn default_protocol_version() -> String {
    "2024-11-05".to_string()
}

fn default_capture_command() -> Vec<String> {
    let command: &[&str] = if cfg!(target_os = "macos") {
        &["screencapture", "-x", "-t", "png", "{image}"]
    } else if cfg!(target_os = "linux") {
        &["grim", "{image}"]
    } else {
        &[]
    };
    command.iter().map(|s| s.to_string()).collect()
}

fn default_recognize_command() -> Vec<String> {
    ["tesseract", "{image}", "stdout"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_chars() -> usize {
    10_000
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from ~/.screen-reader-mcp/config.toml
    /// Falls back to defaults if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Resolve `--config` or the default location, then load
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Save configuration to the given path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("config.toml"))
    }

    /// Get the data directory (~/.screen-reader-mcp)
    pub fn data_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".screen-reader-mcp"))
    }
}
