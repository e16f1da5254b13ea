use crate::conf::ConfigError;
use crate::conf::validation::validate_spec;
use crate::conf::{build_runtime_config, resolve_spec_config};
use crate::decode::Framing;
use std::path::PathBuf;

pub fn check(path: Option<PathBuf>, plain: bool) -> anyhow::Result<()> {
    let spec = match resolve_spec_config(path.as_deref()) {
        Ok(spec) => spec,
        Err(err) => {
            print_config_error(&err);
            std::process::exit(1);
        }
    };

    let report = validate_spec(&spec);
    if report.has_violations() {
        if plain {
            report.render_plain();
        } else {
            report.render_pretty();
        }
    }
    if report.has_errors() {
        std::process::exit(1);
    }

    let cfg = build_runtime_config(spec)?.config;

    println!("✔ Config loaded successfully");
    println!("✔ listening on {}", cfg.server.listen);
    match cfg.server.max_connections {
        Some(max) => println!("✔ at most {max} concurrent clients"),
        None => println!("✔ no connection limit"),
    }
    println!(
        "✔ idle clients evicted after {}s, checked every {}s",
        cfg.connection.idle_timeout.as_secs(),
        cfg.janitor.interval.as_secs()
    );
    println!(
        "✔ {} framing, {} byte reads",
        framing_name(cfg.connection.framing),
        cfg.connection.read_buffer_size
    );
    if !report.warnings.is_empty() {
        println!("✔ {} warning(s)", report.warnings.len());
    }

    Ok(())
}

fn framing_name(framing: Framing) -> &'static str {
    match framing {
        Framing::CarryOver => "carry_over",
        Framing::PerRead => "per_read",
    }
}

fn print_config_error(err: &ConfigError) {
    eprintln!("{err}");
    if let Some(hint) = config_error_hint(err) {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::ReadFile { .. } => Some(
            "Pass an existing file with --config, or omit it to use ./logwell.hcl\n\
             (built-in defaults apply when that file does not exist).",
        ),

        ConfigError::Parse { .. } => Some(
            "The config file is HCL. Every block and field is optional.\n\
             \n\
             Example:\n\
             \n\
             server {\n\
             \x20 host = \"0.0.0.0\"\n\
             \x20 port = 8080\n\
             }\n\
             \n\
             connection {\n\
             \x20 idle_timeout_secs = 30\n\
             \x20 framing           = \"carry_over\"\n\
             }",
        ),

        ConfigError::Validation { .. } => None,
    }
}
