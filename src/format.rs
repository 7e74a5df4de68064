//! Output formatting for the CLI.

use crate::types::{Todo, UserSummary};
use chrono::DateTime;

/// Output format for list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

fn format_ts(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// One-line summary of a todo for list output.
pub fn format_todo_line(todo: &Todo) -> String {
    let mut line = format!(
        "[{}] {:<8.8}  {:<12}  {}",
        if todo.done { "x" } else { " " },
        todo.id,
        todo.status.as_str(),
        todo.title,
    );
    if let Some(priority) = todo.priority {
        line.push_str(&format!("  !{}", priority.as_str()));
    }
    if let Some(due) = todo.due_date {
        line.push_str(&format!("  due:{}", due));
    }
    if let Some(ref assignee) = todo.assignee_id {
        line.push_str(&format!("  @{}", assignee));
    }
    line
}

/// Format a list of todos, one per line, with a trailing count.
pub fn format_todo_list(todos: &[Todo]) -> String {
    let mut out = String::new();
    for todo in todos {
        out.push_str(&format_todo_line(todo));
        out.push('\n');
    }
    out.push_str(&format!("{} todo(s)\n", todos.len()));
    out
}

/// Full detail view of a single todo.
pub fn format_todo(todo: &Todo) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n", todo.title));
    out.push_str(&format!("- id: {}\n", todo.id));
    out.push_str(&format!("- status: {}\n", todo.status.as_str()));
    out.push_str(&format!("- done: {}\n", todo.done));
    out.push_str(&format!("- owner: {} ({})\n", todo.name, todo.user_id));
    if let Some(ref assignee) = todo.assignee_id {
        out.push_str(&format!("- assignee: {}\n", assignee));
    }
    if let Some(priority) = todo.priority {
        out.push_str(&format!("- priority: {}\n", priority.as_str()));
    }
    if let Some(due) = todo.due_date {
        out.push_str(&format!("- due: {}\n", due));
    }
    out.push_str(&format!("- created: {}\n", format_ts(todo.created_at)));
    out.push_str(&format!("- updated: {}\n", format_ts(todo.updated_at)));
    if !todo.description.is_empty() {
        out.push('\n');
        out.push_str(&todo.description);
        out.push('\n');
    }
    out
}

/// Format the known-user list for assignee selection.
pub fn format_users(users: &[UserSummary]) -> String {
    let mut out = String::new();
    for user in users {
        out.push_str(&format!("{:<36}  {}\n", user.id, user.name));
    }
    out.push_str(&format!("{} user(s)\n", users.len()));
    out
}

/// Format the aggregate counters.
pub fn format_stats(incomplete: usize, has_completed: bool) -> String {
    format!(
        "{} incomplete todo(s); completed present: {}\n",
        incomplete,
        if has_completed { "yes" } else { "no" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Priority, Status};

    fn sample() -> Todo {
        Todo {
            id: "0f8fad5b-d9cb-469f-a165-70867728950e".into(),
            title: "Apple".into(),
            description: "Buy some apples".into(),
            status: Status::NotStarted,
            done: false,
            user_id: "user1".into(),
            name: "User 1".into(),
            assignee_id: Some("user2".into()),
            priority: Some(Priority::High),
            due_date: Some("2024-03-01".parse().unwrap()),
            created_at: 1_672_567_200_000,
            updated_at: 1_672_567_200_000,
        }
    }

    #[test]
    fn line_includes_optional_markers() {
        let line = format_todo_line(&sample());
        assert!(line.contains("Apple"));
        assert!(line.contains("!high"));
        assert!(line.contains("due:2024-03-01"));
        assert!(line.contains("@user2"));
        assert!(line.starts_with("[ ]"));
    }

    #[test]
    fn detail_includes_description_block() {
        let detail = format_todo(&sample());
        assert!(detail.contains("# Apple"));
        assert!(detail.contains("- owner: User 1 (user1)"));
        assert!(detail.contains("Buy some apples"));
    }

    #[test]
    fn output_format_parses() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("yaml"), None);
    }
}
