use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub endpoints: EndpointsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Signing secret for bearer tokens. Redacted from Debug output and
    /// skipped when serializing; must not appear in logs or responses.
    #[serde(skip_serializing)]
    pub token_secret: String,
    pub token_ttl_secs: u64,
    pub token_issuer: String,
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("token_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("token_issuer", &self.token_issuer)
            .finish()
    }
}

/// Per-endpoint {enabled, secure} pair. The host platform's admin side may
/// flip these between restarts; the running process treats them as fixed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EndpointToggle {
    pub enabled: bool,
    pub secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    pub login: EndpointToggle,
    pub post: EndpointToggle,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("WICKET_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Security overrides
        if let Ok(v) = env::var("WICKET_TOKEN_SECRET") {
            self.security.token_secret = v;
        }
        if let Ok(v) = env::var("WICKET_TOKEN_TTL_SECS") {
            self.security.token_ttl_secs = v.parse().unwrap_or(self.security.token_ttl_secs);
        }
        if let Ok(v) = env::var("WICKET_TOKEN_ISSUER") {
            self.security.token_issuer = v;
        }

        // Endpoint toggles
        if let Ok(v) = env::var("WICKET_ENDPOINT_LOGIN_ENABLED") {
            self.endpoints.login.enabled = v.parse().unwrap_or(self.endpoints.login.enabled);
        }
        if let Ok(v) = env::var("WICKET_ENDPOINT_LOGIN_SECURE") {
            self.endpoints.login.secure = v.parse().unwrap_or(self.endpoints.login.secure);
        }
        if let Ok(v) = env::var("WICKET_ENDPOINT_POST_ENABLED") {
            self.endpoints.post.enabled = v.parse().unwrap_or(self.endpoints.post.enabled);
        }
        if let Ok(v) = env::var("WICKET_ENDPOINT_POST_SECURE") {
            self.endpoints.post.secure = v.parse().unwrap_or(self.endpoints.post.secure);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                token_secret: "wicket-dev-secret".to_string(),
                token_ttl_secs: 1600,
                token_issuer: "wicket-api".to_string(),
            },
            endpoints: EndpointsConfig {
                login: EndpointToggle { enabled: true, secure: false },
                post: EndpointToggle { enabled: true, secure: true },
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                // Must come in via WICKET_TOKEN_SECRET; the server refuses
                // to start with an empty secret outside development.
                token_secret: String::new(),
                token_ttl_secs: 1600,
                token_issuer: "wicket-api".to_string(),
            },
            endpoints: EndpointsConfig {
                login: EndpointToggle { enabled: true, secure: false },
                post: EndpointToggle { enabled: true, secure: true },
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                token_secret: String::new(),
                token_ttl_secs: 900,
                token_issuer: "wicket-api".to_string(),
            },
            endpoints: EndpointsConfig {
                login: EndpointToggle { enabled: true, secure: false },
                post: EndpointToggle { enabled: true, secure: true },
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
