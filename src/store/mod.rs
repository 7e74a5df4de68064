//! The todo store: canonical collection, mutation operations, persisted
//! view preferences, and change notification.
//!
//! The store is the single writer. Every mutation reads the current
//! collection, builds the replacement, re-serializes the whole value back to
//! storage in the same synchronous step, and then notifies watchers. There
//! is no locking beyond the storage handle's own because there is exactly
//! one logic thread driving mutations.
//!
//! The collection is `Option<Vec<Todo>>`: `None` means never loaded, which
//! is distinct from loaded-and-empty. Mutations against an uninitialized
//! collection, and mutations naming an id that does not exist, are silent
//! no-ops by contract.

pub mod views;
pub mod watch;

use crate::error::Result;
use crate::storage::{Storage, keys, read_json, write_json};
use crate::types::{Status, Todo, TodoCreateInput, TodoUpdateInput};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use views::{SortSpec, ViewParams, derive_visible};
use watch::{ChangeKind, WatcherSet};

/// Current timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Persisted sort/filter preferences. Each field lives under its own storage
/// key and falls back to its documented default when the key is absent. The
/// search term is deliberately not here: it resets every session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewPrefs {
    pub sort: SortSpec,
    pub statuses: Vec<Status>,
    pub assignee_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ViewPrefs {
    fn load(storage: &dyn Storage) -> Result<Self> {
        Ok(Self {
            sort: read_json(storage, keys::SORT_TYPE)?.unwrap_or_default(),
            statuses: read_json(storage, keys::FILTER_TYPE)?.unwrap_or_default(),
            assignee_id: read_json(storage, keys::FILTER_ASSIGNEE_ID)?.unwrap_or_default(),
            // The date keys store an ISO date or an explicit null; both the
            // absent key and the stored null mean "no bound".
            start_date: read_json::<Option<NaiveDate>>(storage, keys::FILTER_START_DATE)?
                .flatten(),
            end_date: read_json::<Option<NaiveDate>>(storage, keys::FILTER_END_DATE)?.flatten(),
        })
    }
}

/// Owner of the canonical todo collection.
pub struct TodoStore {
    storage: Arc<dyn Storage>,
    todos: Option<Vec<Todo>>,
    prefs: ViewPrefs,
    watchers: WatcherSet,
}

impl TodoStore {
    /// Restore the store from persisted storage. An absent `todos` key
    /// leaves the collection uninitialized rather than empty.
    pub fn open(storage: Arc<dyn Storage>) -> Result<Self> {
        let todos = read_json(storage.as_ref(), keys::TODOS)?;
        let prefs = ViewPrefs::load(storage.as_ref())?;
        Ok(Self {
            storage,
            todos,
            prefs,
            watchers: WatcherSet::new(),
        })
    }

    /// Initialize an uninitialized collection to empty and persist it.
    /// Returns `false` if the collection was already initialized.
    pub fn initialize(&mut self) -> Result<bool> {
        if self.todos.is_some() {
            return Ok(false);
        }
        self.todos = Some(Vec::new());
        self.persist_todos()?;
        self.watchers.notify(ChangeKind::Todos);
        info!("todo collection initialized");
        Ok(true)
    }

    pub fn is_initialized(&self) -> bool {
        self.todos.is_some()
    }

    /// The raw collection in insertion order, or `None` if uninitialized.
    pub fn todos(&self) -> Option<&[Todo]> {
        self.todos.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.as_deref()?.iter().find(|todo| todo.id == id)
    }

    /// Create a todo: fresh unique id, both timestamps stamped to now,
    /// appended at the end. Returns the created record, or `None` if the
    /// collection is uninitialized.
    pub fn add(&mut self, input: TodoCreateInput) -> Result<Option<Todo>> {
        let Some(todos) = self.todos.as_mut() else {
            debug!("add ignored: collection uninitialized");
            return Ok(None);
        };

        let now = now_ms();
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            status: input.status,
            done: input.done,
            user_id: input.user_id,
            name: input.name,
            assignee_id: input.assignee_id,
            priority: input.priority,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        };
        todos.push(todo.clone());
        self.persist_todos()?;
        self.watchers.notify(ChangeKind::Todos);
        debug!(id = %todo.id, title = %todo.title, "todo added");
        Ok(Some(todo))
    }

    /// Apply a partial update to the record with the given id, restamping
    /// `updated_at`. `id`, `user_id`, and `created_at` are never touched.
    /// Returns whether a record matched; an unmatched id changes nothing.
    pub fn update(&mut self, id: &str, input: TodoUpdateInput) -> Result<bool> {
        let Some(todos) = self.todos.as_mut() else {
            debug!("update ignored: collection uninitialized");
            return Ok(false);
        };

        let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) else {
            debug!(id, "update ignored: no matching todo");
            return Ok(false);
        };

        if let Some(title) = input.title {
            todo.title = title;
        }
        if let Some(description) = input.description {
            todo.description = description;
        }
        if let Some(status) = input.status {
            todo.status = status;
        }
        if let Some(done) = input.done {
            todo.done = done;
        }
        if let Some(assignee_id) = input.assignee_id {
            todo.assignee_id = assignee_id;
        }
        if let Some(priority) = input.priority {
            todo.priority = priority;
        }
        if let Some(due_date) = input.due_date {
            todo.due_date = due_date;
        }
        todo.updated_at = now_ms();

        self.persist_todos()?;
        self.watchers.notify(ChangeKind::Todos);
        debug!(id, "todo updated");
        Ok(true)
    }

    /// Permanently delete the record with the given id.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let Some(todos) = self.todos.as_mut() else {
            debug!("remove ignored: collection uninitialized");
            return Ok(false);
        };

        let before = todos.len();
        todos.retain(|todo| todo.id != id);
        if todos.len() == before {
            debug!(id, "remove ignored: no matching todo");
            return Ok(false);
        }

        self.persist_todos()?;
        self.watchers.notify(ChangeKind::Todos);
        debug!(id, "todo removed");
        Ok(true)
    }

    /// Flip the completion flag on the record with the given id.
    pub fn toggle_done(&mut self, id: &str) -> Result<bool> {
        let Some(todos) = self.todos.as_mut() else {
            debug!("toggle ignored: collection uninitialized");
            return Ok(false);
        };

        let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) else {
            debug!(id, "toggle ignored: no matching todo");
            return Ok(false);
        };
        todo.done = !todo.done;
        todo.updated_at = now_ms();
        let done = todo.done;

        self.persist_todos()?;
        self.watchers.notify(ChangeKind::Todos);
        debug!(id, done, "todo toggled");
        Ok(true)
    }

    /// Remove every record marked done. Returns how many were removed.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let Some(todos) = self.todos.as_mut() else {
            debug!("clear-completed ignored: collection uninitialized");
            return Ok(0);
        };

        let before = todos.len();
        todos.retain(|todo| !todo.done);
        let removed = before - todos.len();
        if removed > 0 {
            self.persist_todos()?;
            self.watchers.notify(ChangeKind::Todos);
            debug!(removed, "completed todos cleared");
        }
        Ok(removed)
    }

    /// Set the completion flag on every record, restamping each
    /// `updated_at`.
    pub fn set_all_done(&mut self, done: bool) -> Result<()> {
        let Some(todos) = self.todos.as_mut() else {
            debug!("toggle-all ignored: collection uninitialized");
            return Ok(());
        };

        let now = now_ms();
        for todo in todos.iter_mut() {
            todo.done = done;
            todo.updated_at = now;
        }

        self.persist_todos()?;
        self.watchers.notify(ChangeKind::Todos);
        debug!(done, "all todos toggled");
        Ok(())
    }

    /// Count of records not marked done. Reduces over the raw collection,
    /// not the filtered view. Zero when uninitialized.
    pub fn incomplete_count(&self) -> usize {
        self.todos
            .as_deref()
            .map(|todos| todos.iter().filter(|todo| !todo.done).count())
            .unwrap_or(0)
    }

    /// Whether any record is marked done. False when uninitialized.
    pub fn has_completed(&self) -> bool {
        self.todos
            .as_deref()
            .map(|todos| todos.iter().any(|todo| todo.done))
            .unwrap_or(false)
    }

    // --- view preferences -------------------------------------------------

    pub fn prefs(&self) -> &ViewPrefs {
        &self.prefs
    }

    pub fn set_sort(&mut self, sort: SortSpec) -> Result<()> {
        self.prefs.sort = sort;
        write_json(self.storage.as_ref(), keys::SORT_TYPE, &sort)?;
        self.watchers.notify(ChangeKind::Prefs);
        Ok(())
    }

    pub fn set_status_filter(&mut self, statuses: Vec<Status>) -> Result<()> {
        write_json(self.storage.as_ref(), keys::FILTER_TYPE, &statuses)?;
        self.prefs.statuses = statuses;
        self.watchers.notify(ChangeKind::Prefs);
        Ok(())
    }

    pub fn set_assignee_filter(&mut self, assignee_id: String) -> Result<()> {
        write_json(self.storage.as_ref(), keys::FILTER_ASSIGNEE_ID, &assignee_id)?;
        self.prefs.assignee_id = assignee_id;
        self.watchers.notify(ChangeKind::Prefs);
        Ok(())
    }

    pub fn set_date_filter(
        &mut self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<()> {
        write_json(self.storage.as_ref(), keys::FILTER_START_DATE, &start_date)?;
        write_json(self.storage.as_ref(), keys::FILTER_END_DATE, &end_date)?;
        self.prefs.start_date = start_date;
        self.prefs.end_date = end_date;
        self.watchers.notify(ChangeKind::Prefs);
        Ok(())
    }

    // --- derived views ----------------------------------------------------

    /// Run the full derivation pipeline with the persisted preferences and
    /// the given ephemeral search term. Empty when uninitialized.
    pub fn visible(&self, search: &str) -> Vec<Todo> {
        let params = ViewParams {
            sort: self.prefs.sort,
            statuses: self.prefs.statuses.clone(),
            assignee_id: self.prefs.assignee_id.clone(),
            start_date: self.prefs.start_date,
            end_date: self.prefs.end_date,
            search: search.to_string(),
        };
        self.visible_with(&params)
    }

    /// Run the pipeline with explicit parameters, bypassing the persisted
    /// preferences (one-shot overrides).
    pub fn visible_with(&self, params: &ViewParams) -> Vec<Todo> {
        match self.todos.as_deref() {
            Some(todos) => derive_visible(todos, params),
            None => Vec::new(),
        }
    }

    // --- watchers ---------------------------------------------------------

    pub fn watch(&self, watcher: impl Fn(ChangeKind) + Send + 'static) -> u64 {
        self.watchers.watch(watcher)
    }

    pub fn unwatch(&self, id: u64) -> bool {
        self.watchers.unwatch(id)
    }

    fn persist_todos(&self) -> Result<()> {
        if let Some(todos) = self.todos.as_deref() {
            write_json(self.storage.as_ref(), keys::TODOS, todos)?;
        }
        Ok(())
    }
}
