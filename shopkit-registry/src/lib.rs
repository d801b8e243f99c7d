//! Service registry for the shopkit services.
//!
//! A directory mapping logical service names to currently live network
//! addresses. The [`server`] module is the registry itself (run as the
//! `registry-server` binary); [`client::RegistryClient`] is the piece every
//! component issuing remote calls holds, resolving a name to an address on
//! every call so instance churn is observed immediately.

pub mod client;
pub mod server;
pub mod types;

pub use client::{RegistryClient, ResolutionError};
pub use server::{router, router_with_state, RegistryState};
pub use types::{InstancesResponse, RegisterRequest, ServiceInstance};
