//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// CSV file with an `EAN` column
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Enriched CSV written row by row
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// PriceRunner site root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Market code used in API paths (e.g. "se")
    #[serde(default = "default_market")]
    pub market: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Shortest pause between rows, in seconds
    #[serde(default = "default_delay_min_secs")]
    pub delay_min_secs: u64,

    /// Longest pause between rows, in seconds
    #[serde(default = "default_delay_max_secs")]
    pub delay_max_secs: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Output format for summaries and lookups
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_input() -> PathBuf {
    PathBuf::from("inputmargin.csv")
}

fn default_output() -> PathBuf {
    PathBuf::from("outputmargin.csv")
}

fn default_base_url() -> String {
    "https://www.pricerunner.se".to_string()
}

fn default_market() -> String {
    "se".to_string()
}

fn default_delay_min_secs() -> u64 {
    1
}

fn default_delay_max_secs() -> u64 {
    6
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            base_url: default_base_url(),
            market: default_market(),
            proxy: None,
            delay_min_secs: default_delay_min_secs(),
            delay_max_secs: default_delay_max_secs(),
            timeout_secs: default_timeout_secs(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("ean-pricer.toml");
        if local_config.exists() {
            debug!("Found ean-pricer.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("ean-pricer").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides. Unparsable values are ignored.
    pub fn with_env(mut self) -> Self {
        if let Ok(market) = std::env::var("PRICER_MARKET") {
            if !market.trim().is_empty() {
                self.market = market.trim().to_string();
            }
        }

        if let Ok(proxy) = std::env::var("PRICER_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("PRICER_DELAY_MIN") {
            if let Ok(d) = delay.parse() {
                self.delay_min_secs = d;
            }
        }

        if let Ok(delay) = std::env::var("PRICER_DELAY_MAX") {
            if let Ok(d) = delay.parse() {
                self.delay_max_secs = d;
            }
        }

        self
    }

    /// Checks values that cannot be enforced by the types alone.
    pub fn validate(&self) -> Result<()> {
        if self.market.trim().is_empty() {
            anyhow::bail!("Market code must not be empty");
        }

        if self.delay_min_secs > self.delay_max_secs {
            anyhow::bail!(
                "delay_min_secs ({}) is greater than delay_max_secs ({})",
                self.delay_min_secs,
                self.delay_max_secs
            );
        }

        Ok(())
    }
}

/// Output format for run summaries and lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}
