//! # taskpicker
//!
//! A small HTTP service in front of Taskwarrior.
//!
//! This library provides:
//! - Urgency ranking and unbiased random sampling over pending tasks
//! - Single-task pickers that honour a caller-supplied exclusion list
//! - A persisted `uuid -> [int]` association map for client bookkeeping
//!
//! ## Request Flow
//! 1. Receive a request
//! 2. Take a fresh snapshot from the task source (`task ... export`)
//! 3. Rank or sample in memory
//! 4. Return JSON
//!
//! ## Modules
//! - `api`: axum routes and handlers
//! - `task`: task records and the sources they come from
//! - `selection`: ranking and sampling
//! - `association`: association map file store
//! - `config`: environment configuration

pub mod api;
pub mod association;
pub mod config;
pub mod selection;
pub mod task;

pub use association::{AssociationMap, AssociationStore};
pub use config::Config;
pub use task::{Task, TaskSource, TaskView};
