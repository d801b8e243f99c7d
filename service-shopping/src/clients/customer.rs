use std::time::Duration;

use reqwest::StatusCode;
use shopkit_registry::RegistryClient;

use super::{http_client, RemoteError};
use crate::models::Customer;

/// Logical name the customer service registers under.
pub const CUSTOMER_SERVICE: &str = "service-customer";

/// Read-only client for the customer service, used to enrich invoice reads.
#[derive(Clone)]
pub struct CustomerClient {
    registry: RegistryClient,
    http: reqwest::Client,
}

impl CustomerClient {
    pub fn new(registry: RegistryClient, timeout: Duration) -> Self {
        Self {
            registry,
            http: http_client(timeout),
        }
    }

    pub async fn get_customer(&self, customer_id: u64) -> Result<Customer, RemoteError> {
        let address = self
            .registry
            .resolve(CUSTOMER_SERVICE)
            .await
            .map_err(RemoteError::Resolution)?;

        let url = format!("{address}/customers/{customer_id}");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RemoteError::Unreachable(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(customer_id));
        }
        if !resp.status().is_success() {
            return Err(RemoteError::Unreachable(format!(
                "customer service returned {}",
                resp.status()
            )));
        }
        resp.json::<Customer>()
            .await
            .map_err(|e| RemoteError::Unreachable(format!("invalid customer response: {e}")))
    }
}
