use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Dotted path of the offending field, e.g. `connection.idle_timeout_secs`.
    pub field: String,
    pub message: String,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_violations(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    pub(crate) fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            severity: Severity::Error,
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub(crate) fn warning(&mut self, field: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            severity: Severity::Warning,
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn render_plain(&self) {
        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let severity = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            eprintln!("{severity}: {}: {}", issue.field, issue.message);
        }
    }

    pub fn render_pretty(&self) {
        for issue in &self.errors {
            eprintln!(
                "{} {} {}",
                "✖ error".red().bold(),
                issue.field.bold(),
                issue.message
            );
        }
        for issue in &self.warnings {
            eprintln!(
                "{} {} {}",
                "⚠ warning".yellow().bold(),
                issue.field.bold(),
                issue.message
            );
        }
    }
}
