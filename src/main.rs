use std::sync::Arc;

use wicket_api::config::{self, Environment};
use wicket_api::gateway::{app, AppState};
use wicket_api::host::MemoryHost;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up WICKET_TOKEN_SECRET etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("starting Wicket API in {:?} mode", config.environment);

    if config.security.token_secret.is_empty() {
        // Refuse to run token endpoints with nothing to sign with. The
        // secret itself is never logged.
        tracing::error!(
            "no signing secret configured; set WICKET_TOKEN_SECRET (generate one with `wicket secret`)"
        );
        std::process::exit(1);
    }

    let mut host = MemoryHost::from_env();
    if matches!(config.environment, Environment::Development) {
        host = host.with_user("admin", "admin", &["administrator"]);
        tracing::warn!("development mode: seeded default admin user");
    }

    let state = AppState::new(config, Arc::new(host));
    let router = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Wicket API listening on http://{}", bind_addr);

    axum::serve(listener, router).await.expect("server");
}
