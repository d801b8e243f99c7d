//! Registry-aware clients for the peer services.
//!
//! Each call resolves the peer through the registry immediately before
//! issuing the request — addresses are never cached — and carries a bounded
//! timeout. A timed-out mutating call is reported as ambiguous and is never
//! retried here.

mod customer;
mod product;

pub use customer::{CustomerClient, CUSTOMER_SERVICE};
pub use product::{StockClient, StockError, PRODUCT_SERVICE};

use std::time::Duration;

use shopkit_registry::ResolutionError;

/// Failure of a read-only peer lookup.
#[derive(Debug)]
pub enum RemoteError {
    /// The peer does not know the requested id.
    NotFound(u64),
    /// No live instance could be resolved for the peer.
    Resolution(ResolutionError),
    /// The resolved instance could not be reached or answered abnormally.
    Unreachable(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::NotFound(id) => write!(f, "record {id} not found at peer"),
            RemoteError::Resolution(err) => write!(f, "{err}"),
            RemoteError::Unreachable(msg) => write!(f, "peer unreachable: {msg}"),
        }
    }
}

impl std::error::Error for RemoteError {}

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("failed to build peer HTTP client")
}
