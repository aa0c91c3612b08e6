//! Request and response types exchanged over the HTTP API.
//!
//! Every field here is plaintext as seen by an authorized caller. Stored
//! ciphertext never leaves the service.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Request body for `POST /orders`.
///
/// The order is owned by the calling principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// What was ordered.
    pub item: String,
    /// Delivery address. Encrypted before it is stored.
    pub shipping_address: String,
}

/// A single order as returned by `GET /orders/{id}` and `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: u64,
    /// Stable identifier of the owning principal.
    pub owner_id: String,
    pub item: String,
    pub shipping_address: String,
}

/// Response body for `GET /orders`: only the orders the caller may view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Response body for `GET /me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub display_name: String,
    /// Social security number, masked unless the caller may view it in full.
    /// Absent when none is on file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"forbidden"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: always `"ok"` once the process is serving.
    pub status: String,
    /// Configured block cipher, e.g. `"aes-128-cbc"`.
    pub cipher: String,
    /// Configured keyed hash, e.g. `"hmac-sha256"`.
    pub mac: String,
}
