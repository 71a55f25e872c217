//! Association map endpoints.
//!
//! - `GET /dict` - The persisted map, `{}` if nothing was written yet
//! - `POST /dict` - Replace the persisted map with the request body

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::error::ApiError;
use super::routes::AppState;
use super::types::StatusResponse;
use crate::association::AssociationMap;

/// GET /dict - Read the persisted map.
pub async fn read_dict(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AssociationMap>, ApiError> {
    let map = state.associations.read().await?;
    Ok(Json(map))
}

/// POST /dict - Overwrite the persisted map.
pub async fn write_dict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AssociationMap>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(map) = payload?;
    state.associations.write(&map).await?;
    tracing::info!(
        "Replaced association map ({} keys) at {}",
        map.len(),
        state.associations.path().display()
    );
    Ok(Json(StatusResponse::ok()))
}
