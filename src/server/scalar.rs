use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::server::{ApiError, AppState, decode_body};
use crate::store::ScalarKind;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK" })
}

#[derive(Serialize)]
pub struct ScalarResponse {
    key: String,
    value: String,
    kind: ScalarKind,
}

/// GET /scalar/get/{key}
pub async fn get_scalar(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ScalarResponse>, ApiError> {
    let value = state.scalars.get(&key)?.ok_or(ApiError::KeyNotFound)?;
    debug!(key = %key, "scalar get");
    Ok(Json(ScalarResponse {
        kind: ScalarKind::classify(&value),
        key,
        value,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SetScalarRequest {
    /// Missing field stores an empty string
    #[serde(rename = "Value", alias = "value", default)]
    value: String,
}

/// PUT /scalar/set/{key}, body `{"Value": "..."}`
pub async fn set_scalar(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<(), ApiError> {
    let body: SetScalarRequest = decode_body(&body)?;
    state.scalars.set(key, body.value)?;
    Ok(())
}
