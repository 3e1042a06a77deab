//! Ingestion configuration loading.
//!
//! The default configuration is embedded at compile time. A different file
//! can be selected explicitly or through the [`CONFIG_ENV_VAR`] environment
//! variable.

use std::path::Path;

use event_map_ingest_models::IngestConfig;

use crate::IngestError;

/// Environment variable naming a configuration file to load instead of the
/// embedded default.
pub const CONFIG_ENV_VAR: &str = "EVENT_MAP_CONFIG";

/// Embedded default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Parses an ingestion configuration from TOML.
///
/// # Errors
///
/// Returns [`IngestError::Config`] if the TOML is malformed or does not
/// match the configuration schema.
pub fn parse_config(toml_str: &str) -> Result<IngestConfig, IngestError> {
    Ok(toml::from_str(toml_str)?)
}

/// Loads the ingestion configuration.
///
/// Uses `path` when given, otherwise the file named by [`CONFIG_ENV_VAR`],
/// otherwise [`DEFAULT_CONFIG`].
///
/// # Errors
///
/// Returns [`IngestError`] if the selected file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<IngestConfig, IngestError> {
    let from_env = std::env::var_os(CONFIG_ENV_VAR).map(std::path::PathBuf::from);

    match path.map(Path::to_path_buf).or(from_env) {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            parse_config(&std::fs::read_to_string(&path)?)
        }
        None => parse_config(DEFAULT_CONFIG),
    }
}
