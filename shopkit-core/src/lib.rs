//! Shared kernel for the shopkit services.
//!
//! Holds the pieces every service boundary emits or consumes identically:
//! the structured [`error::ErrorMessage`] payload, the [`error::ServiceError`]
//! to HTTP mapping, explicit field validation, the record-store contract with
//! its in-memory backend, configuration loading, and tracing setup.

pub mod config;
pub mod error;
pub mod layers;
pub mod store;
pub mod validation;

pub use config::{ClientSettings, ConfigError, RegistrySettings, ServerConfig, ServiceConfig};
pub use error::{error_response, ErrorMessage, ServiceError, CODE_STOCK_CONFLICT, CODE_VALIDATION};
pub use layers::{default_trace, init_tracing, shutdown_signal};
pub use store::{Entity, InMemoryRepository, Modified, Repository, StoreError};
pub use validation::{ensure_valid, FieldViolation, Validate};
