//! Common types, protocol definitions, and errors shared across the `orders-svc` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
