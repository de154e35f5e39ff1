//! Bearer token → account resolution

use crate::{
    auth::jwt::JwtService, error::AppError, models::user::User, repository::UserDirectory,
};
use std::sync::Arc;

/// Resolves the account behind a bearer token
///
/// Every token or lookup failure collapses into [`AppError::Unauthorized`];
/// only directory outages surface as something else.
pub struct IdentityResolver {
    jwt_service: Arc<JwtService>,
    directory: Arc<dyn UserDirectory>,
}

impl IdentityResolver {
    pub fn new(jwt_service: Arc<JwtService>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            jwt_service,
            directory,
        }
    }

    pub async fn resolve(&self, token: &str) -> Result<User, AppError> {
        let claims = self.jwt_service.decode(token).map_err(|e| {
            tracing::debug!(reason = %e, "Rejecting bearer token");
            AppError::Unauthorized
        })?;

        let email = claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| {
                tracing::debug!("Rejecting bearer token without subject");
                AppError::Unauthorized
            })?;

        self.directory
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                tracing::debug!("Rejecting bearer token for unknown subject");
                AppError::Unauthorized
            })
    }
}
