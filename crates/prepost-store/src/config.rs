//! Store configuration and factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use prepost_core::traits::TabularStore;

use crate::file::JsonFileStore;
use crate::sheets::SheetsStore;

/// Configuration for a tabular store backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    Sheets {
        api_key: String,
        spreadsheet_id: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    File {
        #[serde(default = "default_data_dir")]
        path: PathBuf,
    },
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreConfig::Sheets {
                api_key: _,
                spreadsheet_id,
                base_url,
            } => f
                .debug_struct("Sheets")
                .field("api_key", &"***")
                .field("spreadsheet_id", spreadsheet_id)
                .field("base_url", base_url)
                .finish(),
            StoreConfig::File { path } => {
                f.debug_struct("File").field("path", path).finish()
            }
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./prepost-data")
}

/// Top-level prepost configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepostConfig {
    /// The store backend.
    #[serde(default = "default_store")]
    pub store: StoreConfig,
    /// Worksheet holding the exam records.
    #[serde(default = "default_worksheet")]
    pub worksheet: String,
    /// Exam definition used when `run` is not given `--exam`.
    #[serde(default)]
    pub default_exam: Option<PathBuf>,
}

fn default_store() -> StoreConfig {
    StoreConfig::File {
        path: default_data_dir(),
    }
}

fn default_worksheet() -> String {
    "Data".to_string()
}

impl Default for PrepostConfig {
    fn default() -> Self {
        Self {
            store: default_store(),
            worksheet: default_worksheet(),
            default_exam: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a store config.
fn resolve_store_config(config: &StoreConfig) -> StoreConfig {
    match config {
        StoreConfig::Sheets {
            api_key,
            spreadsheet_id,
            base_url,
        } => StoreConfig::Sheets {
            api_key: resolve_env_vars(api_key),
            spreadsheet_id: resolve_env_vars(spreadsheet_id),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        StoreConfig::File { path } => StoreConfig::File { path: path.clone() },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `prepost.toml` in the current directory
/// 2. `~/.config/prepost/config.toml`
///
/// Environment variable override: `PREPOST_SHEETS_KEY`.
pub fn load_config() -> Result<PrepostConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<PrepostConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("prepost.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<PrepostConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => PrepostConfig::default(),
    };

    // Apply env var override
    if let Ok(key) = std::env::var("PREPOST_SHEETS_KEY") {
        if let StoreConfig::Sheets { api_key, .. } = &mut config.store {
            *api_key = key;
        }
    }

    config.store = resolve_store_config(&config.store);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("prepost"))
}

/// Create a store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Box<dyn TabularStore>> {
    match config {
        StoreConfig::Sheets {
            api_key,
            spreadsheet_id,
            base_url,
        } => Ok(Box::new(SheetsStore::new(
            api_key,
            spreadsheet_id,
            base_url.clone(),
        ))),
        StoreConfig::File { path } => Ok(Box::new(JsonFileStore::new(path.clone()))),
    }
}
