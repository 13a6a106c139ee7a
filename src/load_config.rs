//! `load_config` module: reads the optional YAML config file, applies environment overrides and
//! validates the result into a [`Config`].
//!
//! Every key has a default, so an empty file (or no file at all) yields the stock configuration:
//!
//! ```yaml
//! pagination:
//!   lines_per_page: 70
//!   target_pages: 75
//!   min_lines_for_page_break: 45
//!   header_lines: 2
//!   separator_lines: 1
//! scan:
//!   extensions: [cs, dart]
//!   exclude_patterns: [secret, password]
//! output:
//!   dir: copyright_documents
//!   max_full_pages: 100
//! ```
//!
//! # Errors
//! All errors use `anyhow::Error` and surface at the CLI boundary.

use crate::config::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Overrides `output.dir` when set.
pub const OUTPUT_DIR_ENV: &str = "COPYRIGHT_PAGES_OUTPUT_DIR";

/// Loads a YAML config file, then applies environment overrides and validates.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let config: Config = if config_content.trim().is_empty() {
        Config::default()
    } else {
        match serde_yaml::from_str(&config_content) {
            Ok(conf) => {
                info!(config_path = ?path_ref, "Parsed config YAML successfully");
                conf
            }
            Err(e) => {
                error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
                return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
            }
        }
    };

    finish(config)
}

/// The stock configuration with environment overrides applied.
pub fn load_default_config() -> Result<Config> {
    info!("No config file given, using defaults");
    finish(Config::default())
}

/// Loads `path` when given, the defaults otherwise.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path),
        None => load_default_config(),
    }
}

fn finish(mut config: Config) -> Result<Config> {
    if let Ok(dir) = std::env::var(OUTPUT_DIR_ENV) {
        if !dir.trim().is_empty() {
            info!(output_dir = %dir, "{OUTPUT_DIR_ENV} found in env");
            config.output.dir = PathBuf::from(dir);
        }
    }

    config
        .validate()
        .map_err(|e| {
            error!(error = %e, "Invalid configuration");
            e
        })
        .context("Invalid configuration")?;

    config.trace_loaded();
    Ok(config)
}
