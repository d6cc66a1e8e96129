use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;
use crate::reconstructor::SecondRootPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub second_root: SecondRootPolicy,
    pub entry_kind: String,
    pub log_filter: String,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            second_root: SecondRootPolicy::default(),
            entry_kind: "result".to_string(),
            log_filter: "info".to_string(),
            config_path: default_config_path(),
        }
    }
}

pub fn app_data_dir() -> PathBuf {
    std::env::temp_dir().join("resultchain")
}

pub fn default_config_path() -> PathBuf {
    app_data_dir().join("config.toml")
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.entry_kind.trim().is_empty() {
        return Err(ConfigError::Invalid("entry_kind is required".into()));
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("config_path is required".into()));
    }

    EnvFilter::try_new(&cfg.log_filter)
        .map_err(|e| ConfigError::Invalid(format!("log_filter is not a valid filter: {e}")))?;

    Ok(())
}

/// Loads the config at `path` (or the default location). A missing file
/// yields defaults bound to that path.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path.map_or_else(default_config_path, Path::to_path_buf);

    let mut cfg = match std::fs::read_to_string(&config_path) {
        Ok(raw) => toml::from_str::<Config>(&raw).map_err(|source| ConfigError::Parse {
            path: config_path.clone(),
            source,
        })?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(source) => {
            return Err(ConfigError::Read {
                path: config_path,
                source,
            })
        }
    };

    cfg.config_path = config_path;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg)?;
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: cfg.config_path.clone(),
            source,
        })?;
    }
    let encoded = toml::to_string_pretty(cfg)?;
    std::fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Write {
        path: cfg.config_path.clone(),
        source,
    })
}
