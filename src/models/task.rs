use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Task is yet to be started. The default for new tasks.
    #[serde(rename = "Pending")]
    #[sqlx(rename = "Pending")]
    Pending,
    /// Task is currently being worked on.
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    /// Task is completed.
    #[serde(rename = "Completed")]
    #[sqlx(rename = "Completed")]
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "Pending"),
            TaskStatus::InProgress => write!(f, "In Progress"),
            TaskStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TaskStatus::Pending),
            "In Progress" => Ok(TaskStatus::InProgress),
            "Completed" => Ok(TaskStatus::Completed),
            other => Err(format!("Unknown task status: {}", other)),
        }
    }
}

/// Input structure for creating a task.
///
/// Status is optional and defaults to `Pending`; the owner is never part of
/// the input, it always comes from the authenticated identity.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    /// An optional description, at most 1000 characters.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    /// Optional due date for the task.
    pub due_date: Option<NaiveDate>,
}

/// Input structure for updating a task: a full replacement of the mutable
/// fields. Owner and id are immutable and not part of the payload.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: TaskStatus,

    pub due_date: Option<NaiveDate>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i32,
    /// Identifier of the user who owns the task. Set once at creation from
    /// the authenticated caller, never mutated.
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    /// Timestamp of when the task was created. Immutable.
    pub created_at: DateTime<Utc>,
}

/// Query parameters accepted when listing tasks.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Filter by a single status value. Absent or `"All"` means no filter.
    pub status: Option<String>,
}

impl TaskQuery {
    /// Resolves the raw query value into an optional status filter.
    /// Returns `Err` with the offending value if it names no known status.
    pub fn status_filter(&self) -> Result<Option<TaskStatus>, String> {
        match self.status.as_deref() {
            None | Some("All") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_serialization_roundtrip() {
        for (status, text) in [
            (TaskStatus::Pending, "\"Pending\""),
            (TaskStatus::InProgress, "\"In Progress\""),
            (TaskStatus::Completed, "\"Completed\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), text);
            let parsed: TaskStatus = serde_json::from_str(text).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_parse_from_query_value() {
        assert_eq!("Pending".parse::<TaskStatus>().unwrap(), TaskStatus::Pending);
        assert_eq!(
            "In Progress".parse::<TaskStatus>().unwrap(),
            TaskStatus::InProgress
        );
        assert!("Done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_status_filter_resolution() {
        let query = TaskQuery { status: None };
        assert_eq!(query.status_filter().unwrap(), None);

        let query = TaskQuery {
            status: Some("All".to_string()),
        };
        assert_eq!(query.status_filter().unwrap(), None);

        let query = TaskQuery {
            status: Some("Completed".to_string()),
        };
        assert_eq!(query.status_filter().unwrap(), Some(TaskStatus::Completed));

        let query = TaskQuery {
            status: Some("bogus".to_string()),
        };
        assert!(query.status_filter().is_err());
    }

    #[test]
    fn test_task_input_validation() {
        let valid_input = TaskInput {
            title: "Buy milk".to_string(),
            description: Some("Semi-skimmed".to_string()),
            status: None,
            due_date: None,
        };
        assert!(valid_input.validate().is_ok());

        let empty_title = TaskInput {
            title: "".to_string(),
            description: None,
            status: Some(TaskStatus::Pending),
            due_date: None,
        };
        assert!(empty_title.validate().is_err());

        let long_title = TaskInput {
            title: "a".repeat(201),
            description: None,
            status: None,
            due_date: None,
        };
        assert!(long_title.validate().is_err());

        let long_description = TaskUpdate {
            title: "Valid".to_string(),
            description: Some("b".repeat(1001)),
            status: TaskStatus::Pending,
            due_date: None,
        };
        assert!(long_description.validate().is_err());
    }
}
