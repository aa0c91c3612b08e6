//! Axum request handlers for all service endpoints.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    CreateOrderRequest, ErrorResponse, HealthResponse, OrderListResponse, OrderResponse,
    ProfileResponse,
};
use common::ServiceError;
use fieldsec::{Principal, PrincipalId};

use super::state::AppState;

/// A [`ServiceError`] rendered as a JSON [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse::new(self.0.code(), self.0.to_string());
        (status, Json(body)).into_response()
    }
}

/// Identify the caller from the configured principal header.
fn resolve_principal(state: &AppState, headers: &HeaderMap) -> Result<Principal, ServiceError> {
    let name = state.principal_header_name.as_str();
    let value = headers
        .get(name)
        .ok_or_else(|| ServiceError::Unauthenticated(format!("missing {name} header")))?;
    let value = value.to_str().map_err(|_| {
        ServiceError::Unauthenticated(format!("{name} header contains non-ASCII characters"))
    })?;
    let id: PrincipalId = value
        .parse()
        .map_err(|_| ServiceError::Unauthenticated(format!("{name} header is not a principal id")))?;
    state
        .users
        .resolve(id)
        .ok_or_else(|| ServiceError::Unauthenticated("unknown principal".into()))
}

/// `GET /orders/:id` — one order, if the caller owns it or may view others' orders.
pub async fn get_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<OrderResponse>, ApiError> {
    let principal = resolve_principal(&state, &headers)?;
    let order = state.orders.get_by_id(id, &principal)?;
    Ok(Json(order.into()))
}

/// `GET /orders` — every order the caller may view; other rows are omitted.
pub async fn list_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<OrderListResponse>, ApiError> {
    let principal = resolve_principal(&state, &headers)?;
    let orders = state
        .orders
        .list_visible(&principal)?
        .into_iter()
        .map(OrderResponse::from)
        .collect();
    Ok(Json(OrderListResponse { orders }))
}

/// `POST /orders` — create an order owned by the caller.
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let principal = resolve_principal(&state, &headers)?;
    if req.item.trim().is_empty() {
        return Err(ServiceError::BadRequest("item must not be empty".into()).into());
    }
    let order = state
        .orders
        .create(&principal, req.item, &req.shipping_address)?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// `GET /me` — the caller's own profile, SSN masked unless permitted.
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, ApiError> {
    let principal = resolve_principal(&state, &headers)?;
    let profile = state.users.profile(&principal)?;
    Ok(Json(profile.into()))
}

/// `GET /health` — liveness check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (cipher, mac) = state.algorithms;
    Json(HealthResponse {
        status: "ok".into(),
        cipher: cipher.into(),
        mac: mac.into(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}
