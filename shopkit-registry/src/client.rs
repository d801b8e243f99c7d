use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::types::{InstancesResponse, RegisterRequest};

/// Failure to turn a logical service name into a live address.
///
/// `NoInstance` means the registry answered and knows of no healthy instance;
/// `Registry` means the registry itself could not be queried. Operators need
/// the two apart: the first is a peer-fleet problem, the second a registry
/// problem.
#[derive(Debug)]
pub enum ResolutionError {
    NoInstance(String),
    Registry(String),
}

impl std::fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionError::NoInstance(service) => {
                write!(f, "no instance registered for service '{service}'")
            }
            ResolutionError::Registry(msg) => write!(f, "registry unavailable: {msg}"),
        }
    }
}

impl std::error::Error for ResolutionError {}

/// Client side of the service registry.
///
/// Resolution is performed per call — no address is ever cached — so
/// instance churn (scale-up/down, restart) is observed on the next call.
/// Successive resolutions of the same name rotate round-robin across the
/// registered instances.
#[derive(Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
    cursor: Arc<AtomicUsize>,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build registry HTTP client");
        Self {
            http,
            base_url: base_url.into(),
            cursor: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Resolve a logical service name to a live network address.
    pub async fn resolve(&self, service: &str) -> Result<String, ResolutionError> {
        let url = format!("{}/services/{}", self.base_url, service);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolutionError::Registry(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ResolutionError::Registry(format!(
                "registry returned {}",
                resp.status()
            )));
        }
        let body: InstancesResponse = resp
            .json()
            .await
            .map_err(|e| ResolutionError::Registry(e.to_string()))?;
        if body.instances.is_empty() {
            return Err(ResolutionError::NoInstance(service.to_string()));
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % body.instances.len();
        let address = body.instances[idx].address.clone();
        debug!(service, %address, "Resolved service instance");
        Ok(address)
    }

    /// Register an instance address for a logical service name.
    pub async fn register(&self, service: &str, address: &str) -> Result<(), ResolutionError> {
        let url = format!("{}/services/{}", self.base_url, service);
        let resp = self
            .http
            .post(&url)
            .json(&RegisterRequest {
                address: address.to_string(),
            })
            .send()
            .await
            .map_err(|e| ResolutionError::Registry(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ResolutionError::Registry(format!(
                "registration failed with {}",
                resp.status()
            )));
        }
        Ok(())
    }

    /// Remove an instance address from a logical service name.
    pub async fn deregister(&self, service: &str, address: &str) -> Result<(), ResolutionError> {
        let url = format!(
            "{}/services/{}?address={}",
            self.base_url, service, address
        );
        let resp = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| ResolutionError::Registry(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ResolutionError::Registry(format!(
                "deregistration failed with {}",
                resp.status()
            )));
        }
        Ok(())
    }
}
