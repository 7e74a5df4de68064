//! Identity/session port.
//!
//! The store never authenticates anyone; callers supply `user_id` and the
//! denormalized display name at creation time. This module defines the
//! boundary contract: resolve the current user, list known users for
//! assignee selection, and the sign-in/sign-up/sign-out actions. Session
//! changes are pushed to subscribers asynchronously; subscribers re-derive
//! "who is the user" on each event.
//!
//! Failures on the read paths degrade to "no data" (no user, empty list)
//! rather than propagating. The sign-in/up/out actions return typed errors
//! for the caller to display.

pub mod local;

pub use local::LocalIdentity;

use crate::error::Result;
use crate::types::{User, UserSummary};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// A session state change pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(User),
    SignedOut,
}

#[async_trait]
pub trait Identity: Send + Sync {
    /// The currently authenticated user, or `None` when signed out or when
    /// the lookup fails.
    async fn current_user(&self) -> Option<User>;

    /// All known users, for assignee selection. Empty on failure.
    async fn list_users(&self) -> Vec<UserSummary>;

    /// Create an account and sign in as it.
    async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User>;

    async fn sign_out(&self) -> Result<()>;

    /// Subscribe to session change events. Dropping the receiver
    /// unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}
