//! Picker configuration files.
//!
//! A configuration is a JSON or YAML document shaped like
//! [`chooser_types::PickerConfiguration`]. It is read into a raw
//! [`serde_json::Value`] first so command-line overrides can be layered on
//! top before the final, typed deserialization.
//!
//! Lookup order: an explicit path, then `$CHOOSER_CONFIG_PATH`, then
//! `<config dir>/chooser/picker.yaml`.
//!
//! The log file lives next to the configuration, under `logs/`, unless
//! `$CHOOSER_LOG_PATH` points elsewhere.

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use dirs_next::{config_dir, home_dir};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Environment variable allowing callers to override the configuration path.
pub const CONFIG_PATH_ENV: &str = "CHOOSER_CONFIG_PATH";

/// Default filename inside the `chooser` configuration directory.
pub const CONFIG_FILE_NAME: &str = "picker.yaml";

/// Environment variable overriding where diagnostics are written.
pub const LOG_PATH_ENV: &str = "CHOOSER_LOG_PATH";

/// Error surfaced when a configuration file cannot be read.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read picker configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in picker configuration {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid YAML in picker configuration {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("picker configuration {path} must be a mapping")]
    NotAMapping { path: PathBuf },
}

/// Path consulted when no explicit configuration file is given.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chooser")
        .join(CONFIG_FILE_NAME)
}

/// Path of the diagnostics log written while the dialog owns the terminal.
pub fn default_log_path() -> PathBuf {
    if let Some(path) = env::var_os(LOG_PATH_ENV)
        && !path.is_empty()
    {
        return PathBuf::from(path);
    }

    let config_path = default_config_path();
    let base_directory = config_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    base_directory.join("logs").join("chooser.log")
}

/// Opens `path` for appending, creating missing parent directories.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Reads a configuration document. Files ending in `.json` are parsed as
/// JSON, everything else as YAML.
pub fn load_config_value(path: &Path) -> Result<Value, ConfigLoadError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let value = if is_json {
        serde_json::from_str::<Value>(&text).map_err(|source| ConfigLoadError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml::from_str::<Value>(&text).map_err(|source| ConfigLoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };

    match value {
        Value::Object(_) => Ok(value),
        // An empty YAML file
        Value::Null => Ok(Value::Object(Default::default())),
        _ => Err(ConfigLoadError::NotAMapping { path: path.to_path_buf() }),
    }
}

/// Loads the explicit file when given; otherwise the default file if it
/// exists. Returns an empty mapping when there is nothing to load.
pub fn discover_config_value(explicit: Option<&Path>) -> Result<Value, ConfigLoadError> {
    if let Some(path) = explicit {
        return load_config_value(&expand_tilde(&path.to_string_lossy()));
    }

    let path = default_config_path();
    if path.is_file() {
        debug!(path = %path.display(), "loading picker configuration");
        return load_config_value(&path);
    }
    Ok(Value::Object(Default::default()))
}

fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if trimmed == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(trimmed)
}
