pub mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryHost;

/// User record returned by the host platform on successful authentication.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

#[derive(Error, Debug)]
pub enum HostError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("content rejected: {0}")]
    Rejected(String),

    #[error("host unavailable: {0}")]
    Unavailable(String),
}

/// Seam to the host platform's user and content services.
///
/// The gateway treats these as opaque synchronous calls that may fail;
/// failures surface as per-request errors, never process-fatal.
#[async_trait]
pub trait HostDataLayer: Send + Sync {
    async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserRecord, HostError>;

    async fn insert_content(&self, fields: &Map<String, Value>) -> Result<u64, HostError>;
}
