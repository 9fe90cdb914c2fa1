use crate::config::EndpointsConfig;

/// Statically bound handler tag. Dispatch is an exhaustive match, so adding
/// an endpoint without wiring its handler fails at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerId {
    Login,
    CreatePost,
}

#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    pub name: String,
    pub enabled: bool,
    pub secure: bool,
    pub handler: HandlerId,
}

/// Read-only endpoint table, built once at startup.
pub struct EndpointRegistry {
    entries: Vec<EndpointDescriptor>,
}

impl EndpointRegistry {
    pub fn from_config(endpoints: &EndpointsConfig) -> Self {
        Self {
            entries: vec![
                EndpointDescriptor {
                    name: "login".to_string(),
                    enabled: endpoints.login.enabled,
                    secure: endpoints.login.secure,
                    handler: HandlerId::Login,
                },
                EndpointDescriptor {
                    name: "post".to_string(),
                    enabled: endpoints.post.enabled,
                    secure: endpoints.post.secure,
                    handler: HandlerId::CreatePost,
                },
            ],
        }
    }

    /// Resolve an endpoint by name. Disabled endpoints resolve exactly like
    /// nonexistent ones so callers cannot tell which endpoints are merely
    /// turned off.
    pub fn lookup(&self, name: &str) -> Option<&EndpointDescriptor> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .filter(|e| e.enabled)
    }

    /// The full table in insertion order, for display only.
    pub fn list(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.entries.iter()
    }
}
