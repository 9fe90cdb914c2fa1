use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{any, get},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::handlers;
use crate::host::HostDataLayer;
use crate::registry::{EndpointDescriptor, EndpointRegistry};
use crate::response::{write_error, write_success};
use crate::token::{Subject, TokenService};

/// Shared read-only state: nothing here mutates after startup, so request
/// tasks run without locks.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<EndpointRegistry>,
    pub tokens: Arc<TokenService>,
    pub host: Arc<dyn HostDataLayer>,
}

impl AppState {
    pub fn new(config: &AppConfig, host: Arc<dyn HostDataLayer>) -> Self {
        Self {
            registry: Arc::new(EndpointRegistry::from_config(&config.endpoints)),
            tokens: Arc::new(TokenService::new(&config.security)),
            host,
        }
    }
}

/// Per-request context, owned by the dispatcher for the request's lifetime.
/// Handlers receive a view and never retain it past the call.
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub input: Value,
    pub endpoint: EndpointDescriptor,
    pub user: Option<Subject>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/v1/:endpoint", any(dispatch))
        .fallback(host_fallthrough)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Single-pass dispatch, terminal on first failure:
/// resolve -> authenticate -> decode body -> invoke handler -> respond.
async fn dispatch(
    State(state): State<AppState>,
    Path(endpoint_name): Path<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Unknown and disabled endpoints fall open to host routing; the API
    // surface only intercepts matched, enabled names.
    let Some(endpoint) = state.registry.lookup(&endpoint_name).cloned() else {
        tracing::debug!("no enabled endpoint '{}', falling through", endpoint_name);
        return host_fallthrough().await.into_response();
    };

    let user = if endpoint.secure {
        match authenticate(&state, &headers) {
            Ok(subject) => Some(subject),
            Err(e) => return write_error(&e),
        }
    } else {
        None
    };

    // An empty or unparsable body reaches the handler as "no input";
    // required-field checks then report missing fields uniformly instead of
    // surfacing a parse error.
    let input = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let ctx = RequestContext {
        method,
        path: format!("/api/v1/{}", endpoint_name),
        input,
        endpoint,
        user,
    };

    match handlers::invoke(ctx.endpoint.handler, &ctx, &state).await {
        Ok(payload) => write_success(payload),
        Err(e) => write_error(&e),
    }
}

/// Verify the bearer token on a secure endpoint and yield its subject.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Subject, ApiError> {
    let token = bearer_token(headers)?;
    let claims = state.tokens.verify(&token)?;
    Ok(claims.user)
}

/// Extract the token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get("authorization")
        .ok_or(ApiError::AuthRequired)?;

    let value = header.to_str().map_err(|_| ApiError::TokenInvalid)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ApiError::TokenInvalid),
    }
}

/// Stand-in for the surrounding host's routing: a plain 404 with no
/// API-shaped body, distinguishable from the gateway's JSON errors.
async fn host_fallthrough() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    let endpoints: Vec<Value> = state
        .registry
        .list()
        .filter(|e| e.enabled)
        .map(|e| {
            json!({
                "name": e.name,
                "path": format!("/api/v1/{}", e.name),
                "secure": e.secure,
            })
        })
        .collect();

    Json(json!({
        "name": "Wicket API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoints,
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = value {
            headers.insert("authorization", v.parse().unwrap());
        }
        headers
    }

    #[test]
    fn missing_header_requires_a_token() {
        assert!(matches!(
            bearer_token(&headers(None)),
            Err(ApiError::AuthRequired)
        ));
    }

    #[test]
    fn non_bearer_schemes_are_invalid_not_missing() {
        for bad in ["Basic dXNlcjpwdw==", "Bearer ", "Bearer    ", "token abc"] {
            assert!(
                matches!(bearer_token(&headers(Some(bad))), Err(ApiError::TokenInvalid)),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn bearer_value_is_extracted() {
        let token = bearer_token(&headers(Some("Bearer abc.def.ghi"))).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }
}
