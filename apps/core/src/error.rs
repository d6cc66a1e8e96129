use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid trace json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid trace json5: {0}")]
    Json5(#[from] json5::Error),

    #[error("session {session} references undeclared node '{node}'")]
    UnknownNode { session: usize, node: String },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{0}")]
    Usage(String),

    /// `--help` or `--version`; not a failure.
    #[error("{0}")]
    Info(String),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("trace error: {0}")]
    Trace(#[from] TraceError),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("failed to encode report: {0}")]
    Report(#[source] serde_json::Error),
}
