use clap::{Parser, Subcommand};
use logwell_core::cli::conf::ConfigCmd;
use logwell_core::conf::{build_runtime_config, resolve_spec_config};
use logwell_core::logging::init_logging;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logwell",
    version,
    about = "Logwell: TCP receiver for line-delimited device logs"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the log server (default)
    Run {
        /// Path to the config file (defaults to ./logwell.hcl if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Address to listen on, overrides the config file
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on, overrides the config file
        #[arg(long)]
        port: Option<u16>,
    },

    #[command(flatten)]
    Config(ConfigCmd),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Config(cmd)) => logwell_core::cli::conf::run(cmd),

        Some(Command::Run { config, host, port }) => run(config, host, port),

        None => run(None, None, None),
    };

    if let Err(e) = result {
        eprintln!("logwell: {e:#}");
        std::process::exit(1);
    }
}

fn run(config: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let spec = resolve_spec_config(config.as_deref())?.with_overrides(host, port);
    let validated = build_runtime_config(spec)?;

    let _guard = init_logging(&validated.config.logging)?;
    validated.log_warnings();

    logwell_core::server::run(validated.config)?;
    Ok(())
}
