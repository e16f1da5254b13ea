use crate::conf::{ConfigError, LogFormat, load_config, load_spec_config, resolve_spec_config};
use crate::decode::Framing;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl CapturedOutput {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capturing_subscriber(output: &CapturedOutput) -> impl tracing::Subscriber + Send + Sync {
    let writer = output.clone();
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish()
}

fn lingering_janitor_config() -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("logwell.hcl");
    fs::write(
        &path,
        "connection {\n  idle_timeout_secs = 30\n}\njanitor {\n  interval_secs = 60\n}\n",
    )
    .unwrap();
    (dir, path)
}

#[test]
fn load_full_config_file() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("logwell.hcl");

    fs::write(
        &path,
        r#"
server {
  host                = "127.0.0.1"
  port                = 9090
  max_connections     = 64
  shutdown_grace_secs = 2
}

connection {
  read_buffer_size  = 8192
  idle_timeout_secs = 45
  framing           = "per_read"
  max_line_bytes    = 16384
}

janitor {
  interval_secs = 5
}

logging {
  level  = "debug"
  format = "pretty"
  file   = "/var/log/logwell.log"
}
"#,
    )
    .unwrap();

    // Act
    let cfg = load_config(&path).unwrap().config;

    // Assert
    assert_eq!(cfg.server.listen, "127.0.0.1:9090");
    assert_eq!(cfg.server.max_connections, Some(64));
    assert_eq!(cfg.server.shutdown_grace, Duration::from_secs(2));
    assert_eq!(cfg.connection.read_buffer_size, 8192);
    assert_eq!(cfg.connection.idle_timeout, Duration::from_secs(45));
    assert_eq!(cfg.connection.framing, Framing::PerRead);
    assert_eq!(cfg.connection.max_line_bytes, 16384);
    assert_eq!(cfg.janitor.interval, Duration::from_secs(5));
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.logging.format, LogFormat::Pretty);
    assert_eq!(cfg.logging.file, Some(PathBuf::from("/var/log/logwell.log")));
}

#[test]
fn empty_file_yields_defaults() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("logwell.hcl");
    fs::write(&path, "").unwrap();

    // Act
    let cfg = load_config(&path).unwrap().config;

    // Assert
    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert_eq!(cfg.server.max_connections, None);
    assert_eq!(cfg.connection.read_buffer_size, 4096);
    assert_eq!(cfg.connection.idle_timeout, Duration::from_secs(30));
    assert_eq!(cfg.connection.framing, Framing::CarryOver);
    assert_eq!(cfg.janitor.interval, Duration::from_secs(10));
    assert_eq!(cfg.logging.format, LogFormat::Json);
    assert_eq!(cfg.logging.file, None);
}

#[test]
fn partial_block_keeps_other_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("logwell.hcl");
    fs::write(&path, "server {\n  port = 7000\n}\n").unwrap();

    let cfg = load_config(&path).unwrap().config;

    assert_eq!(cfg.server.listen, "0.0.0.0:7000");
    assert_eq!(cfg.connection.idle_timeout, Duration::from_secs(30));
}

#[test]
fn missing_explicit_file_is_a_read_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.hcl");

    let err = resolve_spec_config(Some(&path)).unwrap_err();

    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn unknown_fields_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("logwell.hcl");
    fs::write(&path, "server {\n  listen = \"0.0.0.0:80\"\n}\n").unwrap();

    let err = load_spec_config(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn invalid_values_fail_validation() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("logwell.hcl");
    fs::write(
        &path,
        "connection {\n  read_buffer_size = 0\n  idle_timeout_secs = 0\n}\n",
    )
    .unwrap();

    // Act
    let err = load_config(&path).unwrap_err();

    // Assert
    let ConfigError::Validation { report } = err else {
        panic!("expected a validation error, got {err:?}");
    };
    let fields: Vec<_> = report.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(
        fields,
        vec!["connection.read_buffer_size", "connection.idle_timeout_secs"]
    );
}

#[test]
fn overrides_replace_host_and_port() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("logwell.hcl");
    fs::write(&path, "server {\n  host = \"10.0.0.1\"\n  port = 7000\n}\n").unwrap();

    let spec = load_spec_config(&path)
        .unwrap()
        .with_overrides(None, Some(7100));

    assert_eq!(spec.server.host, "10.0.0.1");
    assert_eq!(spec.server.port, 7100);
}

#[test]
fn warnings_are_returned_with_the_config_not_logged_early() {
    // Arrange
    let (_dir, path) = lingering_janitor_config();
    let output = CapturedOutput::default();

    // Act
    let validated = tracing::subscriber::with_default(capturing_subscriber(&output), || {
        load_config(&path).unwrap()
    });

    // Assert
    assert_eq!(output.text(), "");
    let fields: Vec<_> = validated
        .validation
        .warnings
        .iter()
        .map(|w| w.field.as_str())
        .collect();
    assert_eq!(fields, vec!["janitor.interval_secs"]);
    assert_eq!(validated.config.janitor.interval, Duration::from_secs(60));
}

#[test]
fn warnings_reach_the_subscriber_once_logging_is_up() {
    // Arrange
    let (_dir, path) = lingering_janitor_config();
    let validated = load_config(&path).unwrap();
    let output = CapturedOutput::default();

    // Act
    tracing::subscriber::with_default(capturing_subscriber(&output), || {
        validated.log_warnings();
    });

    // Assert
    let logged = output.text();
    assert!(logged.contains("WARN"), "no warning line in: {logged}");
    assert!(logged.contains("janitor.interval_secs"), "field missing in: {logged}");
    assert!(
        logged.contains("idle clients will linger"),
        "message missing in: {logged}"
    );
}
