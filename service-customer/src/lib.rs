//! Customer registry service.
//!
//! Owns `Customer` and `Region` records. Other services reference customers
//! by id only; nothing here is shared state.

pub mod models;
pub mod routes;
pub mod service;

/// Logical name this service registers under.
pub const SERVICE_NAME: &str = "service-customer";
