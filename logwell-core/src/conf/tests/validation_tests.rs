use crate::conf::types::ConfigSpec;
use crate::conf::validation::{Severity, validate_spec};
use pretty_assertions::assert_eq;

#[test]
fn default_spec_is_clean() {
    let report = validate_spec(&ConfigSpec::default());

    assert!(!report.has_violations());
}

#[test]
fn zero_max_connections_is_an_error() {
    let mut spec = ConfigSpec::default();
    spec.server.max_connections = Some(0);

    let report = validate_spec(&spec);

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].field, "server.max_connections");
    assert_eq!(report.errors[0].severity, Severity::Error);
}

#[test]
fn empty_host_is_an_error() {
    let mut spec = ConfigSpec::default();
    spec.server.host = "  ".to_string();

    let report = validate_spec(&spec);

    assert_eq!(report.errors[0].field, "server.host");
}

#[test]
fn slow_janitor_is_only_a_warning() {
    // Arrange
    let mut spec = ConfigSpec::default();
    spec.connection.idle_timeout_secs = 5;
    spec.janitor.interval_secs = 60;

    // Act
    let report = validate_spec(&spec);

    // Assert
    assert!(!report.has_errors());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].field, "janitor.interval_secs");
}

#[test]
fn bad_log_level_is_an_error() {
    let mut spec = ConfigSpec::default();
    spec.logging.level = "logwell=loud".to_string();

    let report = validate_spec(&spec);

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].field, "logging.level");
}

#[test]
fn every_error_is_collected() {
    let mut spec = ConfigSpec::default();
    spec.connection.read_buffer_size = 0;
    spec.connection.max_line_bytes = 0;
    spec.janitor.interval_secs = 0;

    let report = validate_spec(&spec);

    assert_eq!(report.errors.len(), 3);
}
