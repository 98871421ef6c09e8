//! Integration settings.
//!
//! Two JSON files drive a run:
//!
//! ```text
//! settings.json         connection parameters + field names (required)
//! ihub_parameters.json  integration-hub run: processId, logLevel (optional)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::log::LogLevel;
use crate::types::{AccessParameters, TrackorType};

/// All errors that can arise while loading settings files.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for the expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Contents of `settings.json`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(rename = "ovUrl")]
    pub ov_url: String,
    #[serde(rename = "ovAccessKey")]
    pub ov_access_key: String,
    #[serde(rename = "ovSecretKey")]
    pub ov_secret_key: String,
    #[serde(rename = "openAIApiKey")]
    pub openai_api_key: String,
    #[serde(rename = "trackorType")]
    pub trackor_type: TrackorType,
    #[serde(rename = "fileField")]
    pub file_field: String,
    #[serde(rename = "fileIdField")]
    pub file_id_field: String,
    #[serde(rename = "loadCheckboxField")]
    pub load_checkbox_field: String,
}

impl Settings {
    pub fn access_parameters(&self) -> AccessParameters {
        AccessParameters::normalize(&self.ov_url, &self.ov_access_key, &self.ov_secret_key)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("ov_url", &self.ov_url)
            .field("ov_access_key", &self.ov_access_key)
            .field("ov_secret_key", &"***")
            .field("openai_api_key", &"***")
            .field("trackor_type", &self.trackor_type)
            .field("file_field", &self.file_field)
            .field("file_id_field", &self.file_id_field)
            .field("load_checkbox_field", &self.load_checkbox_field)
            .finish()
    }
}

/// Contents of `ihub_parameters.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IhubParameters {
    #[serde(rename = "processId")]
    pub process_id: i64,
    #[serde(rename = "logLevel", default)]
    pub log_level: LogLevel,
}

pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    load_json(path)
}

pub fn load_ihub_parameters(path: &Path) -> Result<IhubParameters, SettingsError> {
    load_json(path)
}

fn load_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, SettingsError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
