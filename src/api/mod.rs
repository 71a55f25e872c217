//! HTTP API for taskpicker.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /tasks?n=&k=` - Top `n` pending tasks by urgency plus `k` random others
//! - `GET|POST /most_urgent` - Most urgent task not in `excluded`
//! - `GET|POST /random` - Random task not in `excluded`
//! - `GET|POST /task` - A single task by `uuid`
//! - `GET /dict` - Read the association map
//! - `POST /dict` - Replace the association map

mod dict;
pub mod error;
mod routes;
mod tasks;
pub mod types;

pub use error::ApiError;
pub use routes::{router, serve, AppState};
pub use types::*;
