//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use fieldsec::FieldCipher;

use crate::data::{OrderService, UserDirectory};

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or `Copy`) so that Axum can
/// clone the state for each request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Guarded order access.
    pub orders: Arc<OrderService>,
    /// Principal lookup and profiles.
    pub users: Arc<UserDirectory>,
    /// Names of the configured block cipher and keyed hash.
    pub algorithms: (&'static str, &'static str),
    /// Name of the HTTP header carrying the caller's principal id.
    pub principal_header_name: Arc<String>,
}

impl AppState {
    /// Create a new [`AppState`] with empty in-memory stores sharing `cipher`.
    pub fn new(cipher: FieldCipher, principal_header_name: String) -> Self {
        let algorithms = cipher.algorithms();
        let cipher = Arc::new(cipher);
        Self {
            orders: Arc::new(OrderService::in_memory(cipher.clone())),
            users: Arc::new(UserDirectory::new(cipher)),
            algorithms,
            principal_header_name: Arc::new(principal_header_name),
        }
    }
}
