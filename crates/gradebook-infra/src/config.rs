//! Configuration loader for Gradebook.
//!
//! Reads `config.toml` (from the data directory unless `--config` names
//! another file) and deserializes it into [`AppConfig`]. A missing file means
//! defaults; a file that exists but cannot be read or parsed is an error,
//! because the service must not start on configuration it did not understand.

use std::path::{Path, PathBuf};

use gradebook_types::config::AppConfig;
use gradebook_types::error::ConfigError;

/// `{data_dir}/config.toml`.
pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file cannot be read, returns [`ConfigError::Read`].
/// - If the file fails to parse, returns [`ConfigError::Parse`].
pub async fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                reason: err.to_string(),
            });
        }
    };

    let config = toml::from_str::<AppConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        reason: err.message().to_string(),
    })?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}
