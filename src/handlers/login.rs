use serde_json::{json, Value};

use crate::error::ApiError;
use crate::gateway::{AppState, RequestContext};
use crate::host::HostError;
use crate::token::Subject;
use crate::validate::{validate, FieldFilter, FieldSpec, ValidationSpec};

const INPUT_SPEC: ValidationSpec = ValidationSpec {
    required: &[
        FieldSpec::new("username", FieldFilter::Any),
        FieldSpec::new("password", FieldFilter::Any),
    ],
    optional: &[],
};

/// Authenticate against the host platform and answer with a bearer token.
pub async fn login(ctx: &RequestContext, state: &AppState) -> Result<Value, ApiError> {
    let input = validate(&ctx.input, &INPUT_SPEC)?;

    // Non-string credentials fail host authentication like any other
    // wrong credential.
    let username = input.str("username").unwrap_or_default();
    let password = input.str("password").unwrap_or_default();

    let user = state
        .host
        .authenticate_user(username, password)
        .await
        .map_err(|e| match e {
            HostError::InvalidCredentials => ApiError::InvalidCredentials,
            other => {
                tracing::error!("host authentication unavailable: {}", other);
                ApiError::upstream("Could not reach the authentication service.")
            }
        })?;

    // Tokens are signed, not encrypted: carry identity only.
    let subject = Subject {
        id: user.id,
        username: user.username,
        roles: user.roles,
    };

    let token = state.tokens.issue(&subject)?;

    Ok(json!({ "token": token }))
}
