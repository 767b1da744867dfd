//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "FIB_CONFIG";

/// Why the configuration could not be produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Load configuration: TOML file (if any), then process environment, then validate.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// Empty values are treated as unset.
pub fn apply_env<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(v) = get("PROJECT_NAME") {
        config.service.name = v;
    }
    if let Some(v) = get("PROJECT_DOMAIN") {
        config.service.domain = v;
    }
    if let Some(v) = get("HOSTNAME") {
        config.service.container_id = v;
    }
    if let Some(v) = get("HNY_KEY") {
        config.exporters.honeycomb_api_key = Some(v);
    }
    if let Some(v) = get("HNY_DATASET") {
        config.exporters.honeycomb_dataset = Some(v);
    }
    if let Some(v) = get("JAEGER_ENDPOINT") {
        config.exporters.collector_endpoint = Some(v);
    }
    if let Some(v) = get("FIB_BIND_ADDRESS") {
        config.listener.bind_address = v;
    }
    if let Some(v) = get("FIB_SELF_URL") {
        config.fanout.self_url = v;
    }
}
