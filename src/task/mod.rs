//! Task module - task snapshots and the stores they are read from.
//!
//! This crate never writes tasks; the external store owns their lifecycle.

pub mod source;
pub mod task;
mod taskwarrior;

pub use source::{InMemoryTaskSource, SharedTaskSource, SourceError, TaskSource};
pub use task::{Task, TaskView};
pub use taskwarrior::{parse_export, TaskwarriorSource};
