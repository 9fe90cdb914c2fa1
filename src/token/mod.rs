use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Grace added to `nbf` at issue time so tokens survive modest clock skew
/// between the gateway and its clients.
const CLOCK_SKEW_GRACE_SECS: i64 = 10;

/// Claims carried inside a signed bearer token.
///
/// Field names follow the registered JWT claim names; `user` is the opaque
/// subject attached to authenticated requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    pub jti: String,
    pub user: Subject,
}

/// The authenticated identity embedded in a token. Tokens are signed, not
/// encrypted, so nothing confidential belongs here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token used before its validity window")]
    NotYetValid,

    #[error("token could not be signed: {0}")]
    Signing(String),
}

/// Issues and verifies HS512-signed bearer tokens.
///
/// Holds the process-wide secret; constructed once at startup and shared
/// read-only across requests.
pub struct TokenService {
    secret: String,
    ttl_secs: u64,
    issuer: String,
}

impl TokenService {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            secret: security.token_secret.clone(),
            ttl_secs: security.token_ttl_secs,
            issuer: security.token_issuer.clone(),
        }
    }

    /// Issue a token for `subject` with the configured ttl.
    pub fn issue(&self, subject: &Subject) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, self.ttl_secs)
    }

    /// Issue a token valid from `now + 10s` grace until `nbf + ttl_secs`.
    pub fn issue_with_ttl(&self, subject: &Subject, ttl_secs: u64) -> Result<String, TokenError> {
        let issued_at = Utc::now().timestamp();
        let not_before = issued_at + CLOCK_SKEW_GRACE_SECS;

        let claims = Claims {
            iat: issued_at,
            nbf: not_before,
            exp: not_before + ttl_secs as i64,
            iss: self.issuer.clone(),
            jti: fresh_token_id(),
            user: subject.clone(),
        };

        encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a compact token string and return its claims.
    ///
    /// `exp` and `nbf` are both enforced. Validation leeway (60s default)
    /// exceeds the 10s issue grace, so freshly issued tokens verify
    /// immediately.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_nbf = true;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Malformed,
        })?;

        Ok(data.claims)
    }
}

/// Unique id per issuance: 32 bytes of OS randomness, base64url-encoded.
fn fresh_token_id() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
