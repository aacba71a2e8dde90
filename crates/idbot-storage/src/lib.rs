//! idbot Storage - JSON-backed user registry
//!
//! Every user who messages the bot is recorded once and the whole registry
//! is rewritten to `data/users.json` after each registration.

use idbot_core::{constants, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A registered user, captured the first time they message the bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Unix timestamp of first contact
    pub first_seen: i64,
}

/// User registry persisted as pretty-printed JSON keyed by user ID
pub struct UserStore {
    path: PathBuf,
    users: HashMap<i64, UserRecord>,
}

impl UserStore {
    /// Load the registry from `path`.
    ///
    /// A missing file starts an empty registry and will be created on the
    /// first save. An unreadable or unparsable file also starts empty, with
    /// a warning; the bot keeps running either way.
    pub fn load(path: PathBuf) -> Self {
        let users = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(users) => users,
                Err(e) => {
                    warn!("error decoding {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{} not found, will be created", path.display());
                HashMap::new()
            }
            Err(e) => {
                warn!("error opening {}: {}", path.display(), e);
                HashMap::new()
            }
        };
        Self { path, users }
    }

    /// Load from the default location (`data/users.json`).
    pub fn load_default() -> Self {
        Self::load(constants::users_path())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, user_id: i64) -> Option<&UserRecord> {
        self.users.get(&user_id)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a user if unseen. Returns true when the user is new.
    pub fn register(&mut self, record: UserRecord) -> bool {
        if self.users.contains_key(&record.user_id) {
            return false;
        }
        info!(
            "new user registered: id={} name={} {} username=@{}",
            record.user_id,
            record.first_name,
            record.last_name.as_deref().unwrap_or(""),
            record.username.as_deref().unwrap_or(""),
        );
        self.users.insert(record.user_id, record);
        true
    }

    /// Rewrite the registry file, creating the data directory if needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.users)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(user_id: i64, first_name: &str) -> UserRecord {
        UserRecord {
            user_id,
            username: Some(format!("user{}", user_id)),
            first_name: first_name.to_string(),
            last_name: None,
            first_seen: 1_700_000_000,
        }
    }

    #[test]
    fn test_load_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = UserStore::load(dir.path().join("users.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = UserStore::load(path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_register_is_first_contact_only() {
        let dir = TempDir::new().unwrap();
        let mut store = UserStore::load(dir.path().join("users.json"));

        assert!(store.register(record(42, "Alice")));
        assert!(!store.register(record(42, "Alice again")));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(42).unwrap().first_name, "Alice");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("users.json");

        let mut store = UserStore::load(path.clone());
        store.register(record(1, "Alice"));
        store.register(record(2, "Bob"));
        store.save().unwrap();

        // Save creates the parent directory.
        assert!(path.exists());

        let reloaded = UserStore::load(path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get(1).unwrap().first_name, "Alice");
        assert_eq!(reloaded.get(2), store.get(2));
    }
}
