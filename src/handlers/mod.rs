// The endpoint-name-to-function binding is fixed in code: the registry tags
// each endpoint with a HandlerId and dispatch matches exhaustively.
pub mod login;
pub mod post;

use serde_json::Value;

use crate::error::ApiError;
use crate::gateway::{AppState, RequestContext};
use crate::registry::HandlerId;

pub async fn invoke(
    handler: HandlerId,
    ctx: &RequestContext,
    state: &AppState,
) -> Result<Value, ApiError> {
    match handler {
        HandlerId::Login => login::login(ctx, state).await,
        HandlerId::CreatePost => post::create_post(ctx, state).await,
    }
}
