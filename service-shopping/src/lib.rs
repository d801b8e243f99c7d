//! Shopping/checkout service.
//!
//! Owns `Invoice` records and drives the cross-service stock protocol: a
//! checkout reserves stock by asking the product service — the sole owner of
//! the stock counter — for an atomic decrement per item, resolved through
//! the service registry on every call. Stock failures fail the checkout;
//! nothing here ever proceeds as if stock were reserved when it was not.

pub mod clients;
pub mod models;
pub mod routes;
pub mod service;

/// Logical name this service registers under.
pub const SERVICE_NAME: &str = "service-shopping";
