use crate::conf::error::ConfigError;
use crate::conf::lower::lower_config;
use crate::conf::types::ConfigSpec;
use crate::conf::validation::{ValidatedConfig, validate_spec};
use std::fs;
use std::path::Path;

/// Config file picked up when none is given explicitly.
pub const DEFAULT_CONFIG_PATH: &str = "logwell.hcl";

/// Parse a config file without validating it.
pub fn load_spec_config(path: &Path) -> Result<ConfigSpec, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    hcl::from_str(&contents).map_err(|e| ConfigError::parse(path, e))
}

/// Resolve the operator config.
///
/// An explicit path must exist. Without one, `logwell.hcl` in the working
/// directory is used if present, and the built-in defaults otherwise.
pub fn resolve_spec_config(path: Option<&Path>) -> Result<ConfigSpec, ConfigError> {
    match path {
        Some(path) => load_spec_config(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                load_spec_config(default)
            } else {
                Ok(ConfigSpec::default())
            }
        }
    }
}

/// Validate and lower a spec into the runtime config.
///
/// Errors fail the whole config. Warnings are returned with the config and
/// are not logged here; see [`ValidatedConfig::log_warnings`].
pub fn build_runtime_config(spec: ConfigSpec) -> Result<ValidatedConfig, ConfigError> {
    let validation = validate_spec(&spec);
    if validation.has_errors() {
        return Err(ConfigError::Validation { report: validation });
    }

    Ok(ValidatedConfig {
        config: lower_config(spec),
        validation,
    })
}

/// Load, validate and lower a config file.
pub fn load_config(path: &Path) -> Result<ValidatedConfig, ConfigError> {
    build_runtime_config(load_spec_config(path)?)
}
