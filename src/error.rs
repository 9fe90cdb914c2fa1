// HTTP API Error Types
use axum::response::IntoResponse;
use serde_json::{json, Value};

use crate::token::TokenError;
use crate::validate::ValidateError;

/// Client-visible gateway error with appropriate status codes.
///
/// Unknown and disabled endpoints never take this surface: they fall open
/// to host routing as a plain 404.
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized
    AuthRequired,
    TokenInvalid,
    TokenExpired,
    InvalidCredentials,

    // 403 Forbidden
    PermissionDenied(String),

    // 422 Unprocessable Entity
    MissingField(String),
    InvalidField(String),

    // 502 Bad Gateway (host data layer failure)
    Upstream(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::AuthRequired => 401,
            ApiError::TokenInvalid => 401,
            ApiError::TokenExpired => 401,
            ApiError::InvalidCredentials => 401,
            ApiError::PermissionDenied(_) => 403,
            ApiError::MissingField(_) => 422,
            ApiError::InvalidField(_) => 422,
            ApiError::Upstream(_) => 502,
        }
    }

    /// Get client-safe error message. Never includes the signing secret,
    /// raw token contents, or internal errors.
    pub fn message(&self) -> String {
        match self {
            ApiError::AuthRequired => "This endpoint requires a token.".to_string(),
            ApiError::TokenInvalid => "Invalid token.".to_string(),
            ApiError::TokenExpired => "This token has expired.".to_string(),
            ApiError::InvalidCredentials => "Invalid login credentials.".to_string(),
            ApiError::PermissionDenied(msg) => msg.clone(),
            ApiError::MissingField(field) => format!("{} is required!", field),
            ApiError::InvalidField(field) => format!("{} is invalid!", field),
            ApiError::Upstream(msg) => msg.clone(),
        }
    }

    /// Convert to the wire envelope: `{"error": "<message>"}`
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        ApiError::PermissionDenied(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        ApiError::Upstream(message.into())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ApiError::TokenExpired,
            // Malformed, tampered, and not-yet-valid tokens are
            // indistinguishable to clients.
            TokenError::Malformed | TokenError::BadSignature | TokenError::NotYetValid => {
                ApiError::TokenInvalid
            }
            TokenError::Signing(msg) => {
                tracing::error!("token signing failed: {}", msg);
                ApiError::upstream("Could not issue a token.")
            }
        }
    }
}

impl From<ValidateError> for ApiError {
    fn from(err: ValidateError) -> Self {
        match err {
            ValidateError::MissingField(field) => ApiError::MissingField(field),
            ValidateError::InvalidField(field) => ApiError::InvalidField(field),
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        crate::response::write_error(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_by_error_kind() {
        assert_eq!(ApiError::AuthRequired.status_code(), 401);
        assert_eq!(ApiError::TokenExpired.status_code(), 401);
        assert_eq!(ApiError::permission_denied("no").status_code(), 403);
        assert_eq!(ApiError::MissingField("x".into()).status_code(), 422);
        assert_eq!(ApiError::upstream("down").status_code(), 502);
    }

    #[test]
    fn envelope_is_error_keyed() {
        let body = ApiError::AuthRequired.to_json();
        assert_eq!(body, json!({ "error": "This endpoint requires a token." }));
    }

    #[test]
    fn field_errors_carry_the_field_name() {
        assert_eq!(
            ApiError::MissingField("post_title".into()).message(),
            "post_title is required!"
        );
        assert_eq!(
            ApiError::InvalidField("post_parent".into()).message(),
            "post_parent is invalid!"
        );
    }
}
