use std::io;
use thiserror::Error;

/// Failures that stop the server as a whole.
///
/// Everything that goes wrong on a single connection stays inside its
/// handler and never reaches this type.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read listener address: {0}")]
    LocalAddr(#[source] io::Error),

    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] io::Error),
}
