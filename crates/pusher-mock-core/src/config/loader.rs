//! Multi-pusher config file loading.
//!
//! A config file is a JSON or YAML list of [`DeviceConfig`] records.

use std::path::Path;

use super::DeviceConfig;
use crate::error::ConfigError;

/// Config file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from the file extension.
    ///
    /// Unknown extensions are read as YAML, which also accepts JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Read and parse a config file.
pub fn load_device_configs(path: &Path) -> Result<Vec<DeviceConfig>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_device_configs(&content, ConfigFormat::from_path(path))?;
    tracing::info!("Loaded {} pusher config(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Parse config text into records.
///
/// The document must be a non-empty list; each entry must be a valid record.
pub fn parse_device_configs(
    content: &str,
    format: ConfigFormat,
) -> Result<Vec<DeviceConfig>, ConfigError> {
    let records = match format {
        ConfigFormat::Json => match serde_json::from_str::<serde_json::Value>(content)? {
            serde_json::Value::Array(items) => {
                decode_records(items, |v| serde_json::from_value(v).map_err(|e| e.to_string()))?
            }
            _ => return Err(ConfigError::NotAList),
        },
        ConfigFormat::Yaml => match serde_yaml::from_str::<serde_yaml::Value>(content)? {
            serde_yaml::Value::Sequence(items) => {
                decode_records(items, |v| serde_yaml::from_value(v).map_err(|e| e.to_string()))?
            }
            _ => return Err(ConfigError::NotAList),
        },
    };

    if records.is_empty() {
        return Err(ConfigError::Empty);
    }

    Ok(records)
}

fn decode_records<V, F>(items: Vec<V>, decode: F) -> Result<Vec<DeviceConfig>, ConfigError>
where
    F: Fn(V) -> Result<DeviceConfig, String>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let record = decode(item)
                .map_err(|message| ConfigError::InvalidRecord { index, message })?;
            record
                .validate()
                .map_err(|message| ConfigError::InvalidRecord { index, message })?;
            Ok(record)
        })
        .collect()
}
