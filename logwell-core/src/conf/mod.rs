mod error;
mod loader;
mod lower;
#[cfg(test)]
mod tests;
pub mod types;
pub mod validation;

pub use error::ConfigError;
pub use loader::{
    DEFAULT_CONFIG_PATH, build_runtime_config, load_config, load_spec_config, resolve_spec_config,
};
pub use types::{
    ConfigSpec, ConnectionConfig, JanitorConfig, LogFormat, LoggingConfig, RuntimeConfig,
    ServerConfig,
};
pub use validation::{ValidatedConfig, ValidationReport};
