pub mod init;
mod schema;

pub use schema::{Config, DEFAULT_ADMIN_PASSCODE, DEFAULT_OBSERVER, DEFAULT_SCHOOL_NAME};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::catalog::{load_catalog, Catalog};

/// Get the config directory path (~/.config/conduct-board/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".config").join("conduct-board"))
        .unwrap_or_else(|| PathBuf::from(".conduct-board"))
}

/// Get the default config file path (~/.config/conduct-board/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// With `path` set, the file must exist. Without it, the default location is
/// read if present and built-in defaults are used otherwise.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed or contains unknown fields
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path(), false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(
            "no config at {}, using defaults",
            config_path.display()
        );
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

/// Validate a loaded config, returning every problem found
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.admin_passcode.trim().is_empty() {
        errors.push("admin_passcode: must not be empty".to_string());
    }
    if config.school_name.trim().is_empty() {
        errors.push("school_name: must not be empty".to_string());
    }
    if config.default_observer.trim().is_empty() {
        errors.push("default_observer: must not be empty".to_string());
    }
    if let Some(path) = &config.catalog_path {
        if !path.exists() {
            errors.push(format!(
                "catalog_path: file not found at {}",
                path.display()
            ));
        }
    }
    if let Some(path) = &config.data_path {
        if path.as_os_str().is_empty() {
            errors.push("data_path: must not be empty".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Config {
    /// Where the student store lives
    pub fn effective_data_path(&self) -> PathBuf {
        self.data_path
            .clone()
            .unwrap_or_else(crate::store::json::get_data_path)
    }

    /// The configured catalog, or the built-in one
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => load_catalog(path),
            None => Ok(Catalog::default()),
        }
    }
}
