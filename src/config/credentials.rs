//! Auth context for the collections endpoints.
//!
//! The token is resolved once, when the context is built, and handed to the
//! client. Nothing re-reads the environment per request.

use super::types::AuthConfig;

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Signed-in state as seen by the API client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    token: Option<SecureString>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// Blank tokens count as signed out.
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.trim().is_empty() {
            return Self::anonymous();
        }
        Self {
            token: Some(SecureString::new(token.trim().to_string())),
        }
    }

    /// Config token first, then the configured environment variable.
    pub fn resolve(auth: &AuthConfig) -> Self {
        if let Some(token) = auth.token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Self::with_token(token);
        }
        match std::env::var(&auth.token_env_var) {
            Ok(value) => Self::with_token(value),
            Err(_) => Self::anonymous(),
        }
    }

    pub fn token(&self) -> Option<&SecureString> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// `Authorization` header value, if signed in.
    pub fn bearer(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose()))
    }
}
