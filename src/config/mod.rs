use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::store::PopMode;

/// Log configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
  /// Log file path, if not set, logs will be printed to stdout
  pub file: Option<PathBuf>,
  /// Log level, default is "info"
  #[serde(default = "default_log_level")]
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_log_level(),
    }
  }
}

/// List snapshot configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SnapshotConfig {
  /// Snapshot file path
  #[serde(default = "default_snapshot_path")]
  pub path: PathBuf,
  /// Load the snapshot into the list store at startup
  #[serde(default = "default_true")]
  pub load_on_start: bool,
  /// Save the list store to the snapshot on shutdown
  #[serde(default = "default_true")]
  pub save_on_shutdown: bool,
}

fn default_snapshot_path() -> PathBuf {
  PathBuf::from("db.json")
}

fn default_true() -> bool {
  true
}

impl Default for SnapshotConfig {
  fn default() -> Self {
    Self {
      path: default_snapshot_path(),
      load_on_start: true,
      save_on_shutdown: true,
    }
  }
}

/// List store configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ListConfig {
  /// "legacy" or "exact"
  #[serde(default)]
  pub pop_mode: PopMode,
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
  /// HTTP listening address
  #[serde(default = "default_server_addr")]
  pub server_addr: String,

  /// Log configuration
  #[serde(default)]
  pub log: LogConfig,

  #[serde(default)]
  pub snapshot: SnapshotConfig,

  #[serde(default)]
  pub list: ListConfig,
}

fn default_server_addr() -> String {
  "0.0.0.0:8090".to_string()
}

impl Default for Config {
  fn default() -> Self {
    Self {
      server_addr: default_server_addr(),
      log: LogConfig::default(),
      snapshot: SnapshotConfig::default(),
      list: ListConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from TOML file
  pub fn from_file(path: &str) -> anyhow::Result<Self> {
    let config_str =
      fs::read_to_string(path).with_context(|| format!("Failed to read config file '{}'", path))?;

    Self::parse(&config_str).with_context(|| format!("Failed to parse config file '{}'", path))
  }

  /// Parse configuration from a TOML string
  pub fn parse(config_str: &str) -> anyhow::Result<Self> {
    let config: Config = toml::from_str(config_str)?;
    Ok(config)
  }
}
