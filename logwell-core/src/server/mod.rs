mod acceptor;
mod admission;
mod connection;
mod error;
mod janitor;
mod setup;
mod signal;
#[cfg(test)]
mod tests;

pub use admission::{AdmissionControl, AdmissionGuard};
pub use connection::{ConnectionHandler, ReadOutcome};
pub use error::ServerError;
pub use janitor::Janitor;
pub use setup::{Server, run};
pub use signal::ShutdownSignal;
