//! Product catalog service.
//!
//! Owns `Product` and `Category` records and is the single authority for
//! product stock: decrements are applied here as atomic read-modify-writes,
//! never computed by callers from a previously fetched quantity.

pub mod models;
pub mod routes;
pub mod service;

/// Logical name this service registers under.
pub const SERVICE_NAME: &str = "service-product";
