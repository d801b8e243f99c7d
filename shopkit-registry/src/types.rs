use serde::{Deserialize, Serialize};

/// A live network address registered for a logical service name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    pub address: String,
}

/// Body of a registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub address: String,
}

/// Response to a resolution query. An unknown service name yields an empty
/// instance list, not an error — the client decides how to report it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstancesResponse {
    pub instances: Vec<ServiceInstance>,
}
