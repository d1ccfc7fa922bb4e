use inkpost_core::{AuthState, Role};

/// Source of bearer tokens issued by the identity provider.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current session token, or `None` when nobody is signed in.
    async fn token(&self) -> Option<String>;
}

/// A session established outside this process, e.g. a token pasted from the
/// identity provider's dashboard.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
    user_id: Option<String>,
    role: Role,
}

impl StaticSession {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn new(token: impl Into<String>, user_id: Option<String>, role: Role) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then(|| token.trim().to_string()),
            user_id,
            role,
        }
    }

    pub fn auth_state(&self) -> AuthState {
        match &self.token {
            Some(_) => AuthState::SignedIn {
                user_id: self.user_id.clone().unwrap_or_default(),
                role: self.role,
            },
            None => AuthState::SignedOut,
        }
    }
}

#[async_trait::async_trait]
impl TokenProvider for StaticSession {
    async fn token(&self) -> Option<String> {
        self.token.clone()
    }
}
