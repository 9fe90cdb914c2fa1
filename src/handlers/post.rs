use serde_json::{json, Value};

use crate::error::ApiError;
use crate::gateway::{AppState, RequestContext};
use crate::validate::{validate, FieldFilter, FieldSpec, ValidationSpec};

const INPUT_SPEC: ValidationSpec = ValidationSpec {
    required: &[
        FieldSpec::new("post_title", FieldFilter::Any),
        FieldSpec::new("post_content", FieldFilter::Any),
    ],
    optional: &[
        FieldSpec::new("post_content_filtered", FieldFilter::Any),
        FieldSpec::new("post_excerpt", FieldFilter::Any),
        FieldSpec::new("post_status", FieldFilter::Any),
        FieldSpec::new("post_type", FieldFilter::Any),
        FieldSpec::new("post_date", FieldFilter::Any),
        FieldSpec::new("post_password", FieldFilter::Any),
        FieldSpec::new("post_name", FieldFilter::Any),
        FieldSpec::new("post_parent", FieldFilter::Integer),
        FieldSpec::new("menu_order", FieldFilter::Integer),
        FieldSpec::new("tax_input", FieldFilter::Array),
        FieldSpec::new("meta_input", FieldFilter::Array),
    ],
};

/// Insert content through the host platform on behalf of the token subject.
pub async fn create_post(ctx: &RequestContext, state: &AppState) -> Result<Value, ApiError> {
    // Presence of the authenticated subject is the authorization signal;
    // it is only ever set after token verification on a secure endpoint.
    let user = ctx.user.as_ref().ok_or(ApiError::AuthRequired)?;

    if user.roles.first().map(String::as_str) == Some("subscriber") {
        return Err(ApiError::permission_denied(
            "You do not have the correct permissions to post!",
        ));
    }

    let mut input = validate(&ctx.input, &INPUT_SPEC)?;

    // Contributors may submit but not choose publication status.
    if user.roles.first().map(String::as_str) == Some("contributor") {
        input.remove("post_status");
    }

    input.insert("post_author", json!(user.id));

    let post_id = state
        .host
        .insert_content(input.as_map())
        .await
        .map_err(|e| {
            tracing::warn!("content insert failed for '{}': {}", user.username, e);
            ApiError::upstream("Could not insert post!")
        })?;

    Ok(json!({ "post_id": post_id }))
}
