use crate::conf::lower::lower_config;
use crate::conf::types::{ConfigSpec, LogFormat};
use crate::decode::Framing;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Validated configuration the server runs with.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeConfig {
    pub server: ServerConfig,
    pub connection: ConnectionConfig,
    pub janitor: JanitorConfig,
    pub logging: LoggingConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        lower_config(ConfigSpec::default())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    /// e.g. "0.0.0.0:8080"
    pub listen: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<usize>,

    pub shutdown_grace: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionConfig {
    pub read_buffer_size: usize,
    pub idle_timeout: Duration,
    pub framing: Framing,
    pub max_line_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct JanitorConfig {
    pub interval: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}
