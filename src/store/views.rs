//! Derived views over the todo collection.
//!
//! Four pure stages composed in a fixed order: sort, status filter,
//! attribute filter (assignee + due-date range), search. Each stage is a
//! function of its input and its own parameters only, so every stage and the
//! full pipeline can be tested in isolation. Nothing here mutates the
//! collection or touches storage.

use crate::types::{Status, Todo};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Field to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    CreatedAt,
    Title,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => "createdAt",
            SortKey::Title => "title",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "createdAt" | "created-at" | "created" => Some(SortKey::CreatedAt),
            "title" => Some(SortKey::Title),
            _ => None,
        }
    }
}

/// Sort direction. `None` means "leave insertion order alone".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
    #[default]
    None,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
            SortOrder::None => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            "none" => Some(SortOrder::None),
            _ => None,
        }
    }
}

/// Persisted sort preference. Serialized shape matches the stored
/// `sortType` value: `{"sortType": "title" | "createdAt" | null,
/// "sortOrder": "asc" | "desc" | "none"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(rename = "sortType")]
    pub key: Option<SortKey>,
    #[serde(rename = "sortOrder", default)]
    pub order: SortOrder,
}

/// Parameters for the full pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewParams {
    pub sort: SortSpec,
    /// Allowed statuses. Empty means "show nothing", not "show everything".
    pub statuses: Vec<Status>,
    /// Exact-match assignee filter; empty string disables it.
    pub assignee_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring search; empty disables it.
    pub search: String,
}

/// Case-insensitive title comparison with a byte-order tiebreak so equal
/// titles that differ only in case still order deterministically.
fn title_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Stage 1: sort. A missing key or `SortOrder::None` passes the collection
/// through in insertion order. The sort is stable, so ties keep their
/// relative insertion order.
pub fn sort_stage(todos: &[Todo], sort: &SortSpec) -> Vec<Todo> {
    let mut out: Vec<Todo> = todos.to_vec();
    let Some(key) = sort.key else {
        return out;
    };
    let sign = match sort.order {
        SortOrder::Asc => 1,
        SortOrder::Desc => -1,
        SortOrder::None => return out,
    };

    out.sort_by(|a, b| {
        let ordering = match key {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::Title => title_cmp(&a.title, &b.title),
        };
        if sign < 0 { ordering.reverse() } else { ordering }
    });
    out
}

/// Stage 2: status filter. An empty allow-set excludes every record; the
/// earlier single-filter behavior ("empty means all") is gone for good.
pub fn status_filter_stage(todos: Vec<Todo>, allowed: &[Status]) -> Vec<Todo> {
    if allowed.is_empty() {
        return Vec::new();
    }
    todos
        .into_iter()
        .filter(|todo| allowed.contains(&todo.status))
        .collect()
}

/// Stage 3: attribute filter.
///
/// When an assignee filter is active, unassigned records are excluded. When
/// either date bound is set, records without a due date are excluded and the
/// remaining ones must fall within the bounds, each applied independently
/// and inclusively at day granularity.
pub fn attribute_filter_stage(
    todos: Vec<Todo>,
    assignee_id: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Vec<Todo> {
    let mut out = todos;

    if !assignee_id.is_empty() {
        out.retain(|todo| todo.assignee_id.as_deref() == Some(assignee_id));
    }

    if start_date.is_some() || end_date.is_some() {
        out.retain(|todo| {
            let Some(due) = todo.due_date else {
                return false;
            };
            if let Some(start) = start_date
                && due < start
            {
                return false;
            }
            if let Some(end) = end_date
                && due > end
            {
                return false;
            }
            true
        });
    }

    out
}

/// Stage 4: search. Case-insensitive substring match against title or
/// description; an empty query passes everything through.
pub fn search_stage(todos: Vec<Todo>, query: &str) -> Vec<Todo> {
    if query.is_empty() {
        return todos;
    }
    let needle = query.to_lowercase();
    todos
        .into_iter()
        .filter(|todo| {
            todo.title.to_lowercase().contains(&needle)
                || todo.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// The full pipeline: sort, then status filter, then attribute filter, then
/// search, in that order and no other.
pub fn derive_visible(todos: &[Todo], params: &ViewParams) -> Vec<Todo> {
    let sorted = sort_stage(todos, &params.sort);
    let by_status = status_filter_stage(sorted, &params.statuses);
    let by_attrs = attribute_filter_stage(
        by_status,
        &params.assignee_id,
        params.start_date,
        params.end_date,
    );
    search_stage(by_attrs, &params.search)
}
