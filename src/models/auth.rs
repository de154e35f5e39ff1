//! Authentication-related models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token type label returned alongside every access token
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Login form (OAuth2 password flow, form-encoded)
///
/// `username` carries the account email. Extra OAuth2 fields such as
/// `grant_type` and `scope` are accepted and ignored.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Access token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        }
    }
}
