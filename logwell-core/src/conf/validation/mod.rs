mod report;
mod validate;
mod validated_config;

pub use report::{Severity, ValidationIssue, ValidationReport};
pub use validate::validate_spec;
pub use validated_config::ValidatedConfig;
