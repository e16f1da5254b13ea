use crate::conf::types::{
    ConfigSpec, ConnectionConfig, JanitorConfig, LoggingConfig, RuntimeConfig, ServerConfig,
};
use std::time::Duration;

/// Lower an operator config into its runtime form.
///
/// Expects a spec that already passed validation.
pub fn lower_config(spec: ConfigSpec) -> RuntimeConfig {
    RuntimeConfig {
        server: ServerConfig {
            listen: listen_addr(&spec.server.host, spec.server.port),
            max_connections: spec.server.max_connections,
            shutdown_grace: Duration::from_secs(spec.server.shutdown_grace_secs),
        },
        connection: ConnectionConfig {
            read_buffer_size: spec.connection.read_buffer_size,
            idle_timeout: Duration::from_secs(spec.connection.idle_timeout_secs),
            framing: spec.connection.framing,
            max_line_bytes: spec.connection.max_line_bytes,
        },
        janitor: JanitorConfig {
            interval: Duration::from_secs(spec.janitor.interval_secs),
        },
        logging: LoggingConfig {
            level: spec.logging.level,
            format: spec.logging.format,
            file: spec.logging.file,
        },
    }
}

/// Join host and port, bracketing bare IPv6 literals.
pub(crate) fn listen_addr(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}
