//! Task endpoints.
//!
//! - `GET /tasks` - Most urgent tasks plus a random sample of the rest
//! - `GET|POST /most_urgent` - Uuid of the most urgent non-excluded task
//! - `GET|POST /random` - Uuid of a random non-excluded task
//! - `GET|POST /task` - A single task by uuid
//!
//! Each request takes a fresh snapshot from the task source. The JSON body on
//! the GET|POST endpoints is optional, but a body sent as JSON must parse.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};

use super::error::ApiError;
use super::routes::AppState;
use super::types::*;
use crate::selection::{self, ExclusionSet};
use crate::task::TaskView;

/// GET /tasks - Top `n` by urgency plus `k` random picks from the rest.
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TasksQuery>, QueryRejection>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let Query(params) = query?;
    let n = params.n.unwrap_or(state.config.default_top_n);
    let k = params.k.unwrap_or(state.config.default_random_k);

    let snapshot = state.tasks.fetch_pending().await?;
    let pending = snapshot.len();
    let picked = selection::top_and_random(snapshot, n, k, &mut rand::thread_rng());

    tracing::debug!(
        "Selected {} top and {} random of {} pending (n={}, k={})",
        picked.top.len(),
        picked.random.len(),
        pending,
        n,
        k
    );

    Ok(Json(SelectionResponse {
        top: picked.top.iter().map(TaskView::from).collect(),
        random: picked.random.iter().map(TaskView::from).collect(),
    }))
}

/// GET|POST /most_urgent - Highest-urgency task not in `excluded`.
pub async fn most_urgent(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExclusionQuery>, QueryRejection>,
    body: Result<Json<ExclusionBody>, JsonRejection>,
) -> Result<Json<PickResponse>, ApiError> {
    let excluded = exclusions(query?.0, optional_json(body)?);
    let snapshot = state.tasks.fetch_pending().await?;
    let uuid = selection::most_urgent(&snapshot, &excluded).map(|t| t.uuid.clone());

    tracing::debug!(
        "Most urgent of {} pending ({} excluded): {:?}",
        snapshot.len(),
        excluded.len(),
        uuid
    );
    Ok(Json(PickResponse { uuid }))
}

/// GET|POST /random - Uniformly random task not in `excluded`.
pub async fn random(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExclusionQuery>, QueryRejection>,
    body: Result<Json<ExclusionBody>, JsonRejection>,
) -> Result<Json<PickResponse>, ApiError> {
    let excluded = exclusions(query?.0, optional_json(body)?);
    let snapshot = state.tasks.fetch_pending().await?;
    let uuid = selection::random_task(&snapshot, &excluded, &mut rand::thread_rng())
        .map(|t| t.uuid.clone());

    tracing::debug!(
        "Random pick of {} pending ({} excluded): {:?}",
        snapshot.len(),
        excluded.len(),
        uuid
    );
    Ok(Json(PickResponse { uuid }))
}

/// GET|POST /task - Full view of one task, looked up by uuid.
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UuidParam>, QueryRejection>,
    body: Result<Json<UuidParam>, JsonRejection>,
) -> Result<Json<TaskView>, ApiError> {
    let Query(query) = query?;
    let uuid = optional_json(body)?
        .and_then(|b| b.uuid)
        .or(query.uuid)
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::MissingParameter("uuid"))?;

    match state.tasks.fetch_by_uuid(&uuid).await? {
        Some(task) => Ok(Json(TaskView::from(task))),
        None => Err(ApiError::NotFound(uuid)),
    }
}

/// No JSON content type means no body; anything else sent as JSON must parse.
fn optional_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<Option<T>, ApiError> {
    match body {
        Ok(Json(value)) => Ok(Some(value)),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(None),
        Err(rejection) => Err(rejection.into()),
    }
}

/// A body `excluded` array wins over the query string.
fn exclusions(query: ExclusionQuery, body: Option<ExclusionBody>) -> ExclusionSet {
    if let Some(list) = body.and_then(|b| b.excluded) {
        return list.into_iter().collect();
    }
    query
        .excluded
        .map(|raw| ExclusionSet::from_csv(&raw))
        .unwrap_or_default()
}
