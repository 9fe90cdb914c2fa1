use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::{HostDataLayer, HostError, UserRecord};

struct SeededUser {
    record: UserRecord,
    password_digest: [u8; 32],
}

/// In-memory stand-in for the host platform's data layer.
///
/// Users are seeded at startup; passwords are kept only as sha-256 digests.
/// Inserted content is retained with monotonically assigned ids, which the
/// integration tests read back through [`MemoryHost::content`].
pub struct MemoryHost {
    users: Vec<SeededUser>,
    content: Mutex<Vec<(u64, Map<String, Value>)>>,
    next_id: AtomicU64,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            content: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Seed users from `WICKET_SEED_USERS=user:password:role[,user:...]`.
    /// Malformed entries are skipped with a warning.
    pub fn from_env() -> Self {
        let mut host = Self::new();
        let Ok(spec) = std::env::var("WICKET_SEED_USERS") else {
            return host;
        };

        for entry in spec.split(',').filter(|e| !e.trim().is_empty()) {
            let parts: Vec<&str> = entry.trim().splitn(3, ':').collect();
            match parts.as_slice() {
                [username, password, role] => {
                    host = host.with_user(username, password, &[role]);
                }
                _ => tracing::warn!("skipping malformed WICKET_SEED_USERS entry"),
            }
        }
        host
    }

    pub fn with_user(mut self, username: &str, password: &str, roles: &[&str]) -> Self {
        self.users.push(SeededUser {
            record: UserRecord {
                id: Uuid::new_v4(),
                username: username.to_string(),
                roles: roles.iter().map(|r| r.to_string()).collect(),
            },
            password_digest: digest(password),
        });
        self
    }

    /// Snapshot of inserted content, oldest first.
    pub fn content(&self) -> Vec<(u64, Map<String, Value>)> {
        self.content.lock().expect("content lock poisoned").clone()
    }

    pub fn user(&self, username: &str) -> Option<UserRecord> {
        self.users
            .iter()
            .find(|u| u.record.username == username)
            .map(|u| u.record.clone())
    }
}

fn digest(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

#[async_trait]
impl HostDataLayer for MemoryHost {
    async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserRecord, HostError> {
        self.users
            .iter()
            .find(|u| u.record.username == username && u.password_digest == digest(password))
            .map(|u| u.record.clone())
            .ok_or(HostError::InvalidCredentials)
    }

    async fn insert_content(&self, fields: &Map<String, Value>) -> Result<u64, HostError> {
        if fields.get("post_title").and_then(Value::as_str).map_or(true, str::is_empty) {
            return Err(HostError::Rejected("empty title".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.content
            .lock()
            .expect("content lock poisoned")
            .push((id, fields.clone()));
        Ok(id)
    }
}
