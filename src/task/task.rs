//! Task record as exported by Taskwarrior.
//!
//! # Invariants
//! - `urgency` is finite
//! - `uuid` is the identity used for lookups and exclusion
//!
//! Tasks are read-only snapshots; nothing in this crate mutates the task store.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Date attributes Taskwarrior exports, in export order.
pub const DATE_FIELDS: [&str; 8] = [
    "entry",
    "start",
    "end",
    "due",
    "until",
    "scheduled",
    "wait",
    "modified",
];

/// A single task snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Task {
    /// Working-set id; Taskwarrior reports 0 for tasks outside the working set
    #[serde(default)]
    pub id: Option<u64>,

    pub uuid: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, deserialize_with = "deserialize_urgency")]
    pub urgency: f64,

    #[serde(default, deserialize_with = "deserialize_date")]
    pub entry: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub due: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub until: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub scheduled: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub wait: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub modified: Option<DateTime<Utc>>,

    #[serde(default)]
    pub priority: Option<String>,

    /// Everything else (tags, project, status, annotations, UDAs)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Create a task with only the ranking fields populated.
    pub fn new(uuid: impl Into<String>, description: impl Into<String>, urgency: f64) -> Self {
        Self {
            id: None,
            uuid: uuid.into(),
            description: description.into(),
            urgency,
            entry: None,
            start: None,
            end: None,
            due: None,
            until: None,
            scheduled: None,
            wait: None,
            modified: None,
            priority: None,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Date attributes that are set, paired with their names.
    pub fn dates(&self) -> impl Iterator<Item = (&'static str, DateTime<Utc>)> {
        let values = [
            self.entry,
            self.start,
            self.end,
            self.due,
            self.until,
            self.scheduled,
            self.wait,
            self.modified,
        ];
        DATE_FIELDS
            .into_iter()
            .zip(values)
            .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

/// Parse a Taskwarrior date: compact `20240115T093000Z` or RFC 3339.
pub fn parse_task_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%SZ") {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Render a date the way the HTTP API exposes it.
pub fn format_task_date(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_task_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid task date: {}", s))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUrgency {
    Number(f64),
    Text(String),
}

fn deserialize_urgency<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawUrgency::deserialize(deserializer)? {
        RawUrgency::Number(n) => n,
        RawUrgency::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid urgency {:?}: {}", s, e)))?,
    };
    if value.is_finite() {
        // Adding zero folds -0.0 into 0.0.
        Ok(value + 0.0)
    } else {
        Err(serde::de::Error::custom("urgency must be finite"))
    }
}

/// Wire form of a task.
///
/// Dates become RFC 3339 strings, absent attributes are omitted and any
/// attribute this crate does not model passes through untouched. `id` is
/// omitted both when absent and when it is 0, which Taskwarrior reports for
/// tasks outside the working set.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub uuid: String,
    pub description: String,
    pub urgency: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        let mut fields = task.extra.clone();
        for (name, value) in task.dates() {
            fields.insert(name.to_string(), Value::String(format_task_date(&value)));
        }
        Self {
            id: task.id.filter(|id| *id != 0),
            uuid: task.uuid.clone(),
            description: task.description.clone(),
            urgency: task.urgency,
            priority: task.priority.clone(),
            fields,
        }
    }
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        TaskView::from(&task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exported() -> Value {
        json!({
            "id": 3,
            "description": "Renew passport",
            "due": "20240301T000000Z",
            "entry": "20240115T093000Z",
            "modified": "20240116T101500Z",
            "priority": "H",
            "project": "admin",
            "status": "pending",
            "tags": ["errand", "paperwork"],
            "uuid": "6c1f0a52-7c53-4b33-9d0e-3f0d6e0c1a11",
            "urgency": 14.2
        })
    }

    #[test]
    fn parses_taskwarrior_export_record() {
        let task: Task = serde_json::from_value(exported()).unwrap();
        assert_eq!(task.id, Some(3));
        assert_eq!(task.uuid, "6c1f0a52-7c53-4b33-9d0e-3f0d6e0c1a11");
        assert_eq!(task.urgency, 14.2);
        assert_eq!(task.priority.as_deref(), Some("H"));
        assert_eq!(
            task.due.map(|d| format_task_date(&d)).as_deref(),
            Some("2024-03-01T00:00:00Z")
        );
        assert!(task.start.is_none());
        assert_eq!(task.extra.get("project"), Some(&json!("admin")));
        assert!(!task.extra.contains_key("due"));
    }

    #[test]
    fn urgency_accepts_numeric_strings() {
        let mut record = exported();
        record["urgency"] = json!("7.5");
        let task: Task = serde_json::from_value(record).unwrap();
        assert_eq!(task.urgency, 7.5);
    }

    #[test]
    fn negative_zero_urgency_reads_as_zero() {
        let snapshot: Vec<Task> = serde_json::from_str(
            r#"[{"uuid":"first","urgency":-0.0},{"uuid":"second","urgency":"-0"}]"#,
        )
        .unwrap();
        for task in &snapshot {
            assert_eq!(task.urgency, 0.0);
            assert!(task.urgency.is_sign_positive());
        }
    }

    #[test]
    fn urgency_rejects_garbage() {
        let mut record = exported();
        record["urgency"] = json!("very");
        assert!(serde_json::from_value::<Task>(record).is_err());
    }

    #[test]
    fn missing_urgency_defaults_to_zero() {
        let task: Task = serde_json::from_value(json!({"uuid": "u", "description": "d"})).unwrap();
        assert_eq!(task.urgency, 0.0);
        assert!(task.id.is_none());
    }

    #[test]
    fn parses_rfc3339_dates() {
        let parsed = parse_task_date("2024-01-15T10:30:00+01:00").unwrap();
        assert_eq!(format_task_date(&parsed), "2024-01-15T09:30:00Z");
        assert!(parse_task_date("next tuesday").is_none());
    }

    #[test]
    fn view_renders_dates_and_passes_fields_through() {
        let task: Task = serde_json::from_value(exported()).unwrap();
        let view = serde_json::to_value(TaskView::from(&task)).unwrap();

        assert_eq!(view["id"], json!(3));
        assert_eq!(view["urgency"], json!(14.2));
        assert_eq!(view["entry"], json!("2024-01-15T09:30:00Z"));
        assert_eq!(view["due"], json!("2024-03-01T00:00:00Z"));
        assert_eq!(view["tags"], json!(["errand", "paperwork"]));
        assert_eq!(view["priority"], json!("H"));
        assert!(view.get("start").is_none());
        assert!(view.get("wait").is_none());
    }

    #[test]
    fn view_omits_absent_and_zero_ids() {
        let bare = serde_json::to_value(TaskView::from(Task::new("u-1", "bare", 1.0))).unwrap();
        assert!(bare.get("id").is_none());
        assert!(bare.get("priority").is_none());

        let done = serde_json::to_value(TaskView::from(Task::new("u-2", "done", 0.0).with_id(0)))
            .unwrap();
        assert!(done.get("id").is_none());
    }
}
