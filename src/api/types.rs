//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::task::TaskView;

/// Query parameters for `GET /tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TasksQuery {
    /// Size of the ranked list
    pub n: Option<usize>,

    /// Size of the random sample drawn from the rest
    pub k: Option<usize>,
}

/// `excluded` as a comma-separated query parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExclusionQuery {
    pub excluded: Option<String>,
}

/// `excluded` as a JSON array in the request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExclusionBody {
    pub excluded: Option<Vec<String>>,
}

/// `uuid` as a query parameter or body field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UuidParam {
    pub uuid: Option<String>,
}

/// Response for `GET /tasks`.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionResponse {
    pub top: Vec<TaskView>,
    pub random: Vec<TaskView>,
}

/// Response for single-task pickers; `uuid` is `null` when nothing qualifies.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PickResponse {
    pub uuid: Option<String>,
}

/// Acknowledgement for writes.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
