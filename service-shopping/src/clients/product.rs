use std::time::Duration;

use reqwest::StatusCode;
use shopkit_core::validation::FieldViolation;
use shopkit_core::{ErrorMessage, ServiceError};
use shopkit_registry::{RegistryClient, ResolutionError};
use tracing::info;

use super::{http_client, RemoteError};
use crate::models::Product;

/// Logical name the product service registers under.
pub const PRODUCT_SERVICE: &str = "service-product";

/// Failure modes of a remote stock adjustment.
#[derive(Debug)]
pub enum StockError {
    /// Zero quantity — a caller error caught before any network traffic.
    InvalidQuantity,
    /// The product service does not know the product id.
    NotFound(u64),
    /// The adjustment would drive stock negative; carries the owner's message.
    Insufficient(String),
    /// No live instance could be resolved for the product service.
    Resolution(ResolutionError),
    /// The resolved instance could not be reached, or answered abnormally;
    /// the adjustment did not take effect.
    Unreachable(String),
    /// The request was sent but no response arrived in time. The outcome is
    /// unknown: retrying could decrement twice, so the caller must reconcile
    /// state before retrying the overall operation.
    Ambiguous(String),
}

impl std::fmt::Display for StockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockError::InvalidQuantity => write!(f, "quantity must be a positive number"),
            StockError::NotFound(id) => write!(f, "product {id} not found"),
            StockError::Insufficient(msg) => write!(f, "{msg}"),
            StockError::Resolution(err) => write!(f, "{err}"),
            StockError::Unreachable(msg) => write!(f, "product service unreachable: {msg}"),
            StockError::Ambiguous(msg) => {
                write!(f, "stock adjustment outcome unknown: {msg}")
            }
        }
    }
}

impl std::error::Error for StockError {}

impl From<StockError> for ServiceError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::InvalidQuantity => {
                ServiceError::Validation(ErrorMessage::validation(vec![FieldViolation::new(
                    "quantity",
                    "must be a positive quantity",
                )]))
            }
            StockError::NotFound(id) => ServiceError::NotFound(format!("product {id}")),
            StockError::Insufficient(msg) => {
                ServiceError::Conflict(ErrorMessage::stock_conflict(msg))
            }
            err => ServiceError::Unavailable(err.to_string()),
        }
    }
}

/// Client side of the stock-consistency protocol.
///
/// The product service is the sole source of truth for stock; this client
/// issues a single atomic adjustment request against it and never computes a
/// new quantity from a previously fetched snapshot.
#[derive(Clone)]
pub struct StockClient {
    registry: RegistryClient,
    http: reqwest::Client,
}

impl StockClient {
    pub fn new(registry: RegistryClient, timeout: Duration) -> Self {
        Self {
            registry,
            http: http_client(timeout),
        }
    }

    /// Decrement `product_id`'s stock by `quantity` at the product service.
    ///
    /// Resolution happens immediately before the call so instance churn is
    /// observed, and a resolution failure is reported apart from a call
    /// failure. A timeout after the request was sent is an ambiguous
    /// outcome: it is surfaced as [`StockError::Ambiguous`], never retried
    /// here, since a blind retry risks decrementing twice.
    pub async fn adjust_stock(
        &self,
        product_id: u64,
        quantity: u32,
    ) -> Result<Product, StockError> {
        if quantity == 0 {
            return Err(StockError::InvalidQuantity);
        }

        let address = self
            .registry
            .resolve(PRODUCT_SERVICE)
            .await
            .map_err(StockError::Resolution)?;

        info!(product_id, quantity, %address, "Adjusting stock at product service");
        let url = format!("{address}/products/{product_id}/stock?quantity={quantity}");
        let resp = self
            .http
            .put(&url)
            .send()
            .await
            .map_err(classify_send_error)?;

        match resp.status() {
            StatusCode::OK => resp
                .json::<Product>()
                .await
                .map_err(|e| StockError::Unreachable(format!("invalid product response: {e}"))),
            StatusCode::NOT_FOUND => Err(StockError::NotFound(product_id)),
            StatusCode::CONFLICT => {
                let detail = resp
                    .json::<ErrorMessage>()
                    .await
                    .ok()
                    .and_then(|m| m.messages.into_iter().next())
                    .map(|v| v.message)
                    .unwrap_or_else(|| "insufficient stock".to_string());
                Err(StockError::Insufficient(detail))
            }
            status => Err(StockError::Unreachable(format!(
                "product service returned {status}"
            ))),
        }
    }

    /// Fetch a product snapshot (read-only; used to enrich invoice reads).
    pub async fn get_product(&self, product_id: u64) -> Result<Product, RemoteError> {
        let address = self
            .registry
            .resolve(PRODUCT_SERVICE)
            .await
            .map_err(RemoteError::Resolution)?;

        let url = format!("{address}/products/{product_id}");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RemoteError::Unreachable(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(product_id));
        }
        if !resp.status().is_success() {
            return Err(RemoteError::Unreachable(format!(
                "product service returned {}",
                resp.status()
            )));
        }
        resp.json::<Product>()
            .await
            .map_err(|e| RemoteError::Unreachable(format!("invalid product response: {e}")))
    }
}

/// A connect-phase failure means the request never reached the peer, so the
/// outcome is known. Only a timeout after the request was sent is ambiguous.
fn classify_send_error(err: reqwest::Error) -> StockError {
    if err.is_connect() {
        StockError::Unreachable(err.to_string())
    } else if err.is_timeout() {
        StockError::Ambiguous(err.to_string())
    } else {
        StockError::Unreachable(err.to_string())
    }
}
