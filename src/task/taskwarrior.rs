//! Taskwarrior CLI adapter.
//!
//! Shells out to `task ... export` and parses the JSON array it prints.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error};
use uuid::Uuid;

use super::source::{SourceError, TaskSource};
use super::task::Task;
use crate::config::TaskwarriorConfig;

/// Overrides applied to every invocation so output is machine-readable.
const RC_OVERRIDES: [&str; 3] = [
    "rc.confirmation=off",
    "rc.json.array=on",
    "rc.verbose=nothing",
];

#[derive(Debug, Clone)]
pub struct TaskwarriorSource {
    config: TaskwarriorConfig,
}

impl TaskwarriorSource {
    pub fn new(config: TaskwarriorConfig) -> Self {
        Self { config }
    }

    async fn export(&self, filter: &[String]) -> Result<Vec<Task>, SourceError> {
        let mut cmd = Command::new(&self.config.bin);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .args(RC_OVERRIDES)
            .args(filter)
            .arg("export");

        if let Some(ref taskrc) = self.config.taskrc {
            cmd.env("TASKRC", taskrc);
        }
        if let Some(ref taskdata) = self.config.taskdata {
            cmd.env("TASKDATA", taskdata);
        }

        debug!("Running {} {:?} export", self.config.bin, filter);

        let output = cmd.output().await.map_err(|e| {
            error!("Failed to spawn {}: {}", self.config.bin, e);
            SourceError::Unavailable(format!(
                "failed to run '{}': {}. Is Taskwarrior installed?",
                self.config.bin, e
            ))
        })?;

        if output.status.success() {
            return parse_export(&output.stdout);
        }

        // Some Taskwarrior versions exit non-zero on an empty match but still
        // print a valid (empty) array.
        let printed_array = !String::from_utf8_lossy(&output.stdout).trim().is_empty();
        match parse_export(&output.stdout) {
            Ok(tasks) if printed_array => Ok(tasks),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(SourceError::Unavailable(format!(
                    "'{}' exited with {}: {}",
                    self.config.bin,
                    output.status,
                    stderr.trim()
                )))
            }
        }
    }
}

#[async_trait]
impl TaskSource for TaskwarriorSource {
    async fn fetch_pending(&self) -> Result<Vec<Task>, SourceError> {
        self.export(&["status:pending".to_string()]).await
    }

    async fn fetch_by_uuid(&self, uuid: &str) -> Result<Option<Task>, SourceError> {
        // Anything else would be read by Taskwarrior as a description search.
        if Uuid::parse_str(uuid).is_err() {
            debug!("Not a UUID, skipping lookup: {}", uuid);
            return Ok(None);
        }
        let tasks = self.export(&[format!("uuid:{}", uuid)]).await?;
        Ok(tasks.into_iter().find(|t| t.uuid == uuid))
    }
}

/// Parse the output of `task rc.json.array=on export`.
pub fn parse_export(stdout: &[u8]) -> Result<Vec<Task>, SourceError> {
    let text = std::str::from_utf8(stdout)
        .map_err(|e| SourceError::Malformed(format!("export is not UTF-8: {}", e)))?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).map_err(|e| SourceError::Malformed(e.to_string()))
}
