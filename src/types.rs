//! Core types for tododeck.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Workflow status of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    NotStarted,
    InProgress,
    Completed,
    Pending,
    Done,
}

/// All statuses, in display order.
pub const ALL_STATUSES: [Status; 5] = [
    Status::NotStarted,
    Status::InProgress,
    Status::Completed,
    Status::Pending,
    Status::Done,
];

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotStarted => "not-started",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
            Status::Pending => "pending",
            Status::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "not-started" => Some(Status::NotStarted),
            "in-progress" => Some(Status::InProgress),
            "completed" => Some(Status::Completed),
            "pending" => Some(Status::Pending),
            "done" => Some(Status::Done),
            _ => None,
        }
    }
}

/// Priority level. A record with no priority carries `None`, not a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// A todo record.
///
/// The `done` flag is the completion marker. The stored JSON calls the field
/// `deleted` for historical reasons; it has never meant removal, and the
/// serde rename keeps existing collections loadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    #[serde(rename = "deleted")]
    pub done: bool,
    /// Creating user; never changes after creation.
    pub user_id: String,
    /// Creator display name captured at creation time (not re-synced).
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields the caller supplies when creating a todo.
/// `id`, `created_at`, and `updated_at` are stamped by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoCreateInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    #[serde(rename = "deleted", default)]
    pub done: bool,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Partial update for an existing todo. `None` leaves a field untouched;
/// for the three optional fields, `Some(None)` clears the value.
/// `id`, `user_id`, and `created_at` are not updatable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdateInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(rename = "deleted", default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub assignee_id: Option<Option<String>>,
    #[serde(default)]
    pub priority: Option<Option<Priority>>,
    #[serde(default)]
    pub due_date: Option<Option<NaiveDate>>,
}

/// An authenticated user as seen by callers of the identity port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Compact user representation for assignee selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in ALL_STATUSES {
            assert_eq!(Status::from_str(status.as_str()), Some(status));
        }
        assert_eq!(Status::from_str("cancelled"), None);
    }

    #[test]
    fn todo_serializes_with_legacy_field_names() {
        let todo = Todo {
            id: "1".into(),
            title: "Apple".into(),
            description: String::new(),
            status: Status::NotStarted,
            done: false,
            user_id: "user1".into(),
            name: "User 1".into(),
            assignee_id: None,
            priority: None,
            due_date: None,
            created_at: 1_672_567_200_000,
            updated_at: 1_672_567_200_000,
        };

        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["status"], "not-started");
        assert_eq!(json["deleted"], false);
        assert_eq!(json["userId"], "user1");
        // Absent optionals are omitted, matching collections written before
        // assignee/priority/due-date existed.
        assert!(json.get("assigneeId").is_none());
        assert!(json.get("dueDate").is_none());
    }

    #[test]
    fn update_input_defaults_leave_every_field_untouched() {
        let input: TodoUpdateInput = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        assert_eq!(input.title.as_deref(), Some("New"));
        assert!(input.status.is_none());
        assert!(input.done.is_none());
        assert!(input.priority.is_none());
        assert!(input.due_date.is_none());
    }
}
