use crate::conf::types::RuntimeConfig;
use crate::conf::validation::report::ValidationReport;

/// A runtime config plus the non-fatal issues found while building it.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub config: RuntimeConfig,
    pub validation: ValidationReport,
}

impl ValidatedConfig {
    /// Log every warning through `tracing`.
    ///
    /// Call once logging is initialized, otherwise the events go nowhere.
    pub fn log_warnings(&self) {
        for warning in &self.validation.warnings {
            tracing::warn!(field = %warning.field, "config warning: {}", warning.message);
        }
    }
}
