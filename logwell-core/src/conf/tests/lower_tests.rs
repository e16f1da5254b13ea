use crate::conf::lower::{listen_addr, lower_config};
use crate::conf::types::ConfigSpec;
use crate::conf::RuntimeConfig;
use pretty_assertions::assert_eq;
use std::time::Duration;

#[test]
fn listen_addr_brackets_ipv6() {
    assert_eq!(listen_addr("0.0.0.0", 8080), "0.0.0.0:8080");
    assert_eq!(listen_addr("::", 8080), "[::]:8080");
    assert_eq!(listen_addr("[::1]", 8080), "[::1]:8080");
    assert_eq!(listen_addr("localhost", 1), "localhost:1");
}

#[test]
fn lowering_converts_seconds_to_durations() {
    let mut spec = ConfigSpec::default();
    spec.connection.idle_timeout_secs = 90;
    spec.janitor.interval_secs = 15;
    spec.server.shutdown_grace_secs = 1;

    let cfg = lower_config(spec);

    assert_eq!(cfg.connection.idle_timeout, Duration::from_secs(90));
    assert_eq!(cfg.janitor.interval, Duration::from_secs(15));
    assert_eq!(cfg.server.shutdown_grace, Duration::from_secs(1));
}

#[test]
fn runtime_default_matches_lowered_default_spec() {
    let cfg = RuntimeConfig::default();

    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert_eq!(cfg.connection.idle_timeout, Duration::from_secs(30));
    assert_eq!(cfg.janitor.interval, Duration::from_secs(10));
}
