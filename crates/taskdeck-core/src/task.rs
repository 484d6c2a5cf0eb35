//! Task records as exchanged with the API server.
//!
//! The server owns every task; the client only echoes ids back and keeps the
//! fields it displays or edits.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TaskId)
    }
}

/// Task workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Wire and display label.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Next status in display order (wraps).
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }

    /// Previous status in display order (wraps).
    #[must_use]
    pub fn prev(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::InProgress => TaskStatus::Pending,
            TaskStatus::Completed => TaskStatus::InProgress,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    /// Accepts the wire labels plus the CLI-friendly `in-progress`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in progress" | "in-progress" | "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!(
                "unknown status '{other}' (expected Pending, In Progress or Completed)"
            )),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            TaskPriority::Low => TaskPriority::Medium,
            TaskPriority::Medium => TaskPriority::High,
            TaskPriority::High => TaskPriority::Low,
        }
    }

    #[must_use]
    pub fn prev(self) -> Self {
        match self {
            TaskPriority::Low => TaskPriority::High,
            TaskPriority::Medium => TaskPriority::Low,
            TaskPriority::High => TaskPriority::Medium,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!(
                "unknown priority '{other}' (expected Low, Medium or High)"
            )),
        }
    }
}

/// A task as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, with = "due_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
}

impl Task {
    /// Copies the editable fields into a draft (used when entering edit mode).
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            status: self.status,
            priority: self.priority,
        }
    }

    /// Display text for the due date column.
    pub fn due_label(&self) -> String {
        self.due_date
            .map_or_else(|| "N/A".to_string(), |d| d.format("%Y-%m-%d").to_string())
    }
}

/// Client-local, not-yet-persisted task fields (create or edit).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    #[serde(default, with = "due_date")]
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

impl TaskDraft {
    /// True when the title has visible characters.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Parses a user-entered due date. Empty input means "no date".
///
/// Accepts `YYYY-MM-DD` as well as a full timestamp, keeping the date part.
///
/// # Errors
/// Returns a display message when the input is not a date.
pub fn parse_due_date(input: &str) -> Result<Option<NaiveDate>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let date_part = trimmed.split('T').next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|_err| "Due date must be YYYY-MM-DD.".to_string())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

mod due_date {
    //! Due dates travel as `YYYY-MM-DD`; the server may answer with a full
    //! datetime, an empty string or null.

    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => super::parse_due_date(&s).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_status_wire_labels() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            json!("In Progress")
        );
        let parsed: TaskStatus = serde_json::from_value(json!("Completed")).unwrap();
        assert_eq!(parsed, TaskStatus::Completed);
    }

    #[test]
    fn test_task_accepts_datetime_and_null_description() {
        let task: Task = serde_json::from_value(json!({
            "id": 3,
            "title": "Write report",
            "description": null,
            "due_date": "2025-06-01T00:00:00Z",
            "status": "In Progress",
            "priority": "High",
            "created_at": "2025-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(task.id, TaskId(3));
        assert_eq!(task.description, "");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[test]
    fn test_task_missing_optional_fields_use_defaults() {
        let task: Task = serde_json::from_value(json!({"id": 1, "title": "X"})).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.due_date, None);
        assert_eq!(task.due_label(), "N/A");
    }

    #[test]
    fn test_empty_due_date_string_is_none() {
        let task: Task =
            serde_json::from_value(json!({"id": 1, "title": "X", "due_date": ""})).unwrap();
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_default_draft_matches_reset_shape() {
        let value = serde_json::to_value(TaskDraft::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "",
                "description": "",
                "due_date": null,
                "status": "Pending",
                "priority": "Medium"
            })
        );
    }

    #[test]
    fn test_draft_serializes_date_only() {
        let draft = TaskDraft {
            title: "Ship".into(),
            due_date: NaiveDate::from_ymd_opt(2030, 1, 2),
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["due_date"], json!("2030-01-02"));
    }

    #[test]
    fn test_has_title_rejects_whitespace() {
        let draft = TaskDraft {
            title: "   \t".into(),
            ..Default::default()
        };
        assert!(!draft.has_title());
    }

    #[test]
    fn test_parse_status_and_priority_from_cli_words() {
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("HIGH".parse::<TaskPriority>(), Ok(TaskPriority::High));
        assert!("urgent".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn test_parse_due_date_rejects_garbage() {
        assert_eq!(parse_due_date(""), Ok(None));
        assert!(parse_due_date("next week").is_err());
    }
}
