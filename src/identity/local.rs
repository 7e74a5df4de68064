//! Local identity service backed by the key-value storage.
//!
//! Stands in for the hosted auth service: accounts live under the `users`
//! key (argon2 password hashes, never plaintext) and the active session is
//! the signed-in user's id under the `session` key. The record set mirrors
//! what the hosted service's user-sync would maintain, so assignee lookup
//! works the same way.

use super::{Identity, SessionEvent};
use crate::error::{Error, Result};
use crate::storage::{Storage, keys, read_json, write_json};
use crate::store::now_ms;
use crate::types::{User, UserSummary};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

/// A stored account. The password hash never leaves this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    created_at: i64,
}

impl UserRecord {
    fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

pub struct LocalIdentity {
    storage: Arc<dyn Storage>,
    events: broadcast::Sender<SessionEvent>,
}

impl LocalIdentity {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { storage, events }
    }

    fn load_users(&self) -> Result<Vec<UserRecord>> {
        Ok(read_json(self.storage.as_ref(), keys::USERS)?.unwrap_or_default())
    }

    fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| Error::PasswordHash(err.to_string()))
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    fn set_session(&self, user: &User) -> Result<()> {
        write_json(self.storage.as_ref(), keys::SESSION, &user.id)?;
        let _ = self.events.send(SessionEvent::SignedIn(user.clone()));
        Ok(())
    }
}

#[async_trait]
impl Identity for LocalIdentity {
    async fn current_user(&self) -> Option<User> {
        let session_id: String = match read_json(self.storage.as_ref(), keys::SESSION) {
            Ok(Some(id)) => id,
            Ok(None) => return None,
            Err(err) => {
                warn!(%err, "failed to read session; treating as signed out");
                return None;
            }
        };

        match self.load_users() {
            Ok(users) => users
                .iter()
                .find(|record| record.id == session_id)
                .map(UserRecord::to_user),
            Err(err) => {
                warn!(%err, "failed to load users; treating as signed out");
                None
            }
        }
    }

    async fn list_users(&self) -> Vec<UserSummary> {
        match self.load_users() {
            Ok(users) => users
                .into_iter()
                .map(|record| UserSummary {
                    id: record.id,
                    name: record.name,
                })
                .collect(),
            Err(err) => {
                warn!(%err, "failed to load users; returning empty list");
                Vec::new()
            }
        }
    }

    async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let mut users = self.load_users()?;
        if users.iter().any(|record| record.email == email) {
            return Err(Error::EmailTaken(email.to_string()));
        }

        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: Self::hash_password(password)?,
            created_at: now_ms(),
        };
        let user = record.to_user();
        users.push(record);
        write_json(self.storage.as_ref(), keys::USERS, &users)?;

        self.set_session(&user)?;
        debug!(id = %user.id, "user signed up");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let users = self.load_users()?;
        // One error for both unknown email and wrong password.
        let record = users
            .iter()
            .find(|record| record.email == email)
            .ok_or(Error::InvalidCredentials)?;
        if !Self::verify_password(password, &record.password_hash) {
            return Err(Error::InvalidCredentials);
        }

        let user = record.to_user();
        self.set_session(&user)?;
        debug!(id = %user.id, "user signed in");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        self.storage.delete(keys::SESSION)?;
        let _ = self.events.send(SessionEvent::SignedOut);
        debug!("user signed out");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
