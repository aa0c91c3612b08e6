//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Identify the calling principal from the configured header.
//! - Define the Axum router with all routes and shared middleware.
//! - Translate service errors into JSON error responses.

pub mod handlers;
pub mod router;
pub mod state;
