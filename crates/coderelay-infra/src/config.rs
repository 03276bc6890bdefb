//! Tuning file loader for coderelay.
//!
//! Reads an optional TOML file and deserializes it into [`AppConfig`]. Falls
//! back to defaults when no path is given, or when the file is missing or
//! malformed.

use std::path::Path;

use coderelay_types::config::AppConfig;

/// Load the tuning file at `path`.
///
/// - `None` returns [`AppConfig::default()`].
/// - A missing file logs at debug level and returns the default.
/// - An unreadable or unparsable file logs a warning and returns the default.
pub async fn load_config(path: Option<&Path>) -> AppConfig {
    let Some(path) = path else {
        return AppConfig::default();
    };

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => {
            tracing::info!("Loaded config from {}", path.display());
            config
        }
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}
