use crate::conf::validation::ValidationReport;
use crate::conf::types::ConfigSpec;
use tracing_subscriber::EnvFilter;

/// Check a config spec, collecting every issue rather than stopping at the first.
pub fn validate_spec(spec: &ConfigSpec) -> ValidationReport {
    let mut report = ValidationReport::default();

    if spec.server.host.trim().is_empty() {
        report.error("server.host", "must not be empty");
    }

    if spec.server.max_connections == Some(0) {
        report.error(
            "server.max_connections",
            "must be at least 1 (omit it for no limit)",
        );
    }

    if spec.connection.read_buffer_size == 0 {
        report.error("connection.read_buffer_size", "must be greater than 0");
    }

    if spec.connection.max_line_bytes == 0 {
        report.error("connection.max_line_bytes", "must be greater than 0");
    } else if spec.connection.max_line_bytes < spec.connection.read_buffer_size {
        report.warning(
            "connection.max_line_bytes",
            "smaller than read_buffer_size; long lines will be split",
        );
    }

    if spec.connection.idle_timeout_secs == 0 {
        report.error("connection.idle_timeout_secs", "must be greater than 0");
    }

    if spec.janitor.interval_secs == 0 {
        report.error("janitor.interval_secs", "must be greater than 0");
    } else if spec.janitor.interval_secs > spec.connection.idle_timeout_secs {
        report.warning(
            "janitor.interval_secs",
            "longer than connection.idle_timeout_secs; idle clients will linger past the timeout",
        );
    }

    if let Err(e) = EnvFilter::try_new(&spec.logging.level) {
        report.error("logging.level", format!("invalid filter directive: {e}"));
    }

    report
}
