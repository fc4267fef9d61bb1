//! Known-User Registry
//!
//! Persists the list of user ids that ever interacted with the bot as a
//! JSON array on disk. The file is read once at startup (a missing file
//! means an empty list) and rewritten in full whenever a new user shows
//! up. Registrations are serialized by an async lock held across the
//! write, so concurrent new users cannot corrupt the file.
//!
//! A failed write is logged and otherwise ignored: the in-memory set
//! stays authoritative for the process lifetime and the next successful
//! write restores the file.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::errors::BotError;

/// Registry of users who interacted with the bot
#[derive(Debug)]
pub struct UserRegistry {
    path: PathBuf,
    users: Mutex<Vec<i64>>,
}

impl UserRegistry {
    /// Load the registry from `path`.
    ///
    /// A missing file yields an empty registry; an unreadable or
    /// malformed file is an error so a bad deploy cannot silently wipe
    /// the list on the next registration.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, BotError> {
        let path = path.into();

        let users = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                BotError::Persistence(format!("Failed to read users file {:?}: {}", path, e))
            })?;
            serde_json::from_str(&contents).map_err(|e| {
                BotError::Persistence(format!("Failed to parse users file {:?}: {}", path, e))
            })?
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            users: Mutex::new(users),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a user id, returning true if it was not known before.
    ///
    /// New registrations rewrite the whole file while the lock is held.
    pub async fn register(&self, user_id: i64) -> bool {
        let mut users = self.users.lock().await;

        if users.contains(&user_id) {
            return false;
        }
        users.push(user_id);

        match serde_json::to_string(&*users) {
            Ok(json) => {
                if let Err(e) = tokio::fs::write(&self.path, json).await {
                    tracing::warn!("Failed to write users file {:?}: {}", self.path, e);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to serialize users list: {}", e);
            }
        }

        tracing::info!("Registered new user {}", user_id);
        true
    }

    /// Number of known users
    pub async fn count(&self) -> usize {
        self.users.lock().await.len()
    }
}
