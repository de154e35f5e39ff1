//! JWT token generation and validation
//! Stateless access tokens: the subject email plus an absolute expiration

use crate::{
    auth::clock::{Clock, SystemClock},
    config::AppConfig,
    error::AppError,
};
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, sync::Arc};
use thiserror::Error;

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account email)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration (UNIX seconds)
    pub exp: i64,
}

/// Token decoding failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is malformed or its signature is invalid")]
    Malformed,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtService {
    pub fn new(secret: &[u8], algorithm: Algorithm, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            ttl,
            clock,
        }
    }

    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::from_config_with_clock(config, Arc::new(SystemClock))
    }

    /// Create JWT service from config with an explicit time source
    pub fn from_config_with_clock(
        config: &AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let secret = config.security.secret_key.expose_secret();

        // Ensure secret is at least 32 bytes for HMAC
        if secret.len() < 32 {
            return Err(AppError::Config("Secret key too short (min 32 chars)".to_string()));
        }

        let algorithm = config.security.signing_algorithm()?;
        let ttl = Duration::minutes(config.security.access_token_expire_minutes as i64);

        Ok(Self::new(secret.as_bytes(), algorithm, ttl, clock))
    }

    /// Token time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject`, expiring `ttl` from now
    pub fn issue(&self, subject: Option<&str>) -> Result<String, TokenError> {
        let expiration = self.clock.now() + self.ttl;

        let claims = Claims {
            sub: subject.map(str::to_string),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {:?}", e);
            TokenError::Encoding(e.to_string())
        })
    }

    /// Validate and decode token
    ///
    /// Expiry is judged against the injected clock: a token is expired at
    /// and after its `exp` instant.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                TokenError::Malformed
            })?
            .claims;

        if self.clock.now().timestamp() >= claims.exp {
            tracing::debug!(exp = claims.exp, "Token expired");
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
