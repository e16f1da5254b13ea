use thiserror::Error;

/// Why a line is not a structured record.
///
/// Never surfaced to operators: the line is kept as text instead.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("line is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, found {kind}")]
    NotAnObject { kind: &'static str },
}
