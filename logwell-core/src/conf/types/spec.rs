use crate::decode::Framing;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration file as written by the operator.
///
/// Every block and field is optional; an empty file describes the defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSpec {
    #[serde(default)]
    pub server: ServerSpec,

    #[serde(default)]
    pub connection: ConnectionSpec,

    #[serde(default)]
    pub janitor: JanitorSpec,

    #[serde(default)]
    pub logging: LoggingSpec,
}

impl ConfigSpec {
    /// Apply command-line overrides on top of the file.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSpec {
    /// Interface to bind, e.g. "0.0.0.0" or "::1".
    pub host: String,

    pub port: u16,

    /// Optional cap on concurrently registered connections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<usize>,

    /// How long shutdown waits for connection tasks to finish.
    pub shutdown_grace_secs: u64,
}

impl Default for ServerSpec {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_connections: None,
            shutdown_grace_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionSpec {
    /// Bytes requested per read.
    pub read_buffer_size: usize,

    /// Connections silent for longer than this are evicted.
    pub idle_timeout_secs: u64,

    pub framing: Framing,

    /// Longest unterminated line kept back by `carry_over` framing.
    pub max_line_bytes: usize,
}

impl Default for ConnectionSpec {
    fn default() -> Self {
        Self {
            read_buffer_size: 4096,
            idle_timeout_secs: 30,
            framing: Framing::CarryOver,
            max_line_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct JanitorSpec {
    pub interval_secs: u64,
}

impl Default for JanitorSpec {
    fn default() -> Self {
        Self { interval_secs: 10 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSpec {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,

    pub format: LogFormat,

    /// Optional log file, written in addition to stdout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingSpec {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            file: None,
        }
    }
}
