use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::schema::Config;
use crate::error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "REVIEWLENS_CONFIG";

const BATCH_SIZE_ENV: &str = "BATCH_SIZE";
const MODEL_ENV: &str = "REVIEWLENS_MODEL";
const BASE_URL_ENV: &str = "REVIEWLENS_BASE_URL";
const OUTPUT_DIR_ENV: &str = "OUTPUT_DIR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// `.yaml` and `.yml` files are YAML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content, ConfigFormat::from_path(path))
}

pub fn load_config_from_str(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
    let config: Config = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
    };

    validate_config(&config)?;

    Ok(config)
}

/// Default config file location: `<config dir>/reviewlens/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reviewlens").join("config.json"))
}

/// Builds the effective configuration for a run.
///
/// The file named by `REVIEWLENS_CONFIG` is required to exist; otherwise the
/// default location is used when present and built-in defaults when not.
/// Environment overrides are applied last.
pub fn load_effective_config<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(CONFIG_PATH_ENV) {
        Some(path) => {
            info!("Loading config from {}", path);
            load_config(&path)?
        }
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => {
                info!("Loading config from {}", path.display());
                load_config(&path)?
            }
            None => {
                debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config)?;
    Ok(config)
}

/// Applies environment overrides through `lookup` (normally `std::env::var`).
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(BATCH_SIZE_ENV) {
        config.batch_size = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::InvalidEnv {
                name: BATCH_SIZE_ENV.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }
        })?;
    }
    if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
        config.service.model = model.trim().to_string();
    }
    if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.service.base_url = url.trim().to_string();
    }
    if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.trim().is_empty()) {
        config.output.directory = dir.trim().to_string();
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.batch_size == 0 {
        return Err(validation("batch_size must be at least 1"));
    }
    if config.retry.max_attempts == 0 {
        return Err(validation("retry.max_attempts must be at least 1"));
    }
    if config.service.base_url.trim().is_empty() {
        return Err(validation("service.base_url must not be empty"));
    }
    if config.service.model.trim().is_empty() {
        return Err(validation("service.model must not be empty"));
    }
    if config.service.max_tokens == 0 {
        return Err(validation("service.max_tokens must be at least 1"));
    }
    if config.dataset.text_column.is_empty() || config.dataset.category_column.is_empty() {
        return Err(validation("dataset column names must not be empty"));
    }
    if config.output.directory.trim().is_empty() {
        return Err(validation("output.directory must not be empty"));
    }
    Ok(())
}

fn validation(message: &str) -> ConfigError {
    ConfigError::Validation {
        message: message.to_string(),
    }
}
