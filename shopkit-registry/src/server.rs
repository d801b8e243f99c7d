use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use dashmap::DashMap;
use serde::Deserialize;
use tracing::info;

use crate::types::{InstancesResponse, RegisterRequest, ServiceInstance};

/// Shared state of the registry server: logical service name to the list of
/// currently registered instances.
#[derive(Clone, Default)]
pub struct RegistryState {
    services: Arc<DashMap<String, Vec<ServiceInstance>>>,
}

impl RegistryState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Build the registry router with a fresh state.
pub fn router() -> Router {
    router_with_state(RegistryState::new())
}

/// Build the registry router over existing state (shared with tests).
pub fn router_with_state(state: RegistryState) -> Router {
    Router::new()
        .route("/services", get(list_services))
        .route(
            "/services/{name}",
            get(resolve_service)
                .post(register_instance)
                .delete(deregister_instance),
        )
        .with_state(state)
}

async fn list_services(
    State(state): State<RegistryState>,
) -> Json<BTreeMap<String, Vec<ServiceInstance>>> {
    let listing = state
        .services
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect();
    Json(listing)
}

async fn resolve_service(
    State(state): State<RegistryState>,
    Path(name): Path<String>,
) -> Json<InstancesResponse> {
    let instances = state
        .services
        .get(&name)
        .map(|entry| entry.value().clone())
        .unwrap_or_default();
    Json(InstancesResponse { instances })
}

async fn register_instance(
    State(state): State<RegistryState>,
    Path(name): Path<String>,
    Json(body): Json<RegisterRequest>,
) -> StatusCode {
    let instance = ServiceInstance {
        address: body.address,
    };
    let mut instances = state.services.entry(name.clone()).or_default();
    if !instances.contains(&instance) {
        info!(service = %name, address = %instance.address, "Registering instance");
        instances.push(instance);
    }
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
struct AddressParams {
    address: String,
}

async fn deregister_instance(
    State(state): State<RegistryState>,
    Path(name): Path<String>,
    Query(params): Query<AddressParams>,
) -> StatusCode {
    if let Some(mut instances) = state.services.get_mut(&name) {
        instances.retain(|i| i.address != params.address);
        info!(service = %name, address = %params.address, "Deregistered instance");
    }
    StatusCode::NO_CONTENT
}
