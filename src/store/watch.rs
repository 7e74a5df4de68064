//! Change notification for derived views.
//!
//! The store owns the canonical collection; presentation layers hold derived
//! views that must be recomputed when an upstream input changes. Rather than
//! a hidden reactive graph, the store carries an explicit watcher set: each
//! mutation reports a [`ChangeKind`] and every registered watcher is invoked
//! synchronously so it can re-derive what it displays.

use std::sync::Mutex;

/// Category of state change a watcher may care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The todo collection changed (add, update, remove, toggle, bulk ops).
    Todos,
    /// A persisted view preference changed (sort, filters).
    Prefs,
}

type Watcher = Box<dyn Fn(ChangeKind) + Send>;

/// Registered watchers, invoked in registration order on every change.
///
/// Interior mutability so the store can notify from `&self` read paths and
/// watchers can be registered while the store is shared.
#[derive(Default)]
pub struct WatcherSet {
    watchers: Mutex<Vec<(u64, Watcher)>>,
    next_id: Mutex<u64>,
}

impl WatcherSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a watcher. Returns a token for [`Self::unwatch`].
    pub fn watch(&self, watcher: impl Fn(ChangeKind) + Send + 'static) -> u64 {
        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;
        self.watchers.lock().unwrap().push((id, Box::new(watcher)));
        id
    }

    /// Remove a watcher. Returns `true` if it was registered.
    pub fn unwatch(&self, id: u64) -> bool {
        let mut watchers = self.watchers.lock().unwrap();
        let before = watchers.len();
        watchers.retain(|(watcher_id, _)| *watcher_id != id);
        watchers.len() != before
    }

    /// Invoke every watcher with the given change kind.
    pub fn notify(&self, kind: ChangeKind) {
        let watchers = self.watchers.lock().unwrap();
        for (_, watcher) in watchers.iter() {
            watcher(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn watchers_receive_notifications() {
        let set = WatcherSet::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = Arc::clone(&count);
        set.watch(move |kind| {
            if kind == ChangeKind::Todos {
                count_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        set.notify(ChangeKind::Todos);
        set.notify(ChangeKind::Prefs);
        set.notify(ChangeKind::Todos);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unwatch_stops_delivery() {
        let set = WatcherSet::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = Arc::clone(&count);
        let id = set.watch(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        set.notify(ChangeKind::Todos);
        assert!(set.unwatch(id));
        set.notify(ChangeKind::Todos);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!set.unwatch(id));
    }
}
