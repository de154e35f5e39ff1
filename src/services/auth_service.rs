//! 认证服务：登录与令牌刷新

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    error::AppError,
    models::{
        auth::{LoginForm, TokenResponse},
        user::User,
    },
    repository::UserDirectory,
};
use std::sync::Arc;

pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    password_hasher: Arc<PasswordHasher>,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        password_hasher: Arc<PasswordHasher>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            directory,
            password_hasher,
            jwt_service,
        }
    }

    /// 用户登录
    ///
    /// 账户不存在与密码错误返回同一个 `InvalidCredentials`。
    pub async fn login(&self, credentials: LoginForm) -> Result<TokenResponse, AppError> {
        let user = self.directory.find_by_email(&credentials.username).await?;

        let user = match user {
            Some(user) if self.password_hasher.verify(&credentials.password, &user.password_hash) => {
                user
            }
            _ => {
                tracing::info!("Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let response = self.issue_for(&user)?;

        tracing::info!(user_id = user.id, "Login succeeded");

        Ok(response)
    }

    /// 刷新令牌
    ///
    /// 调用方已通过身份解析，因此不再校验凭据。
    pub fn refresh(&self, current_user: &User) -> Result<TokenResponse, AppError> {
        let response = self.issue_for(current_user)?;

        tracing::debug!(user_id = current_user.id, "Access token refreshed");

        Ok(response)
    }

    fn issue_for(&self, user: &User) -> Result<TokenResponse, AppError> {
        let access_token = self
            .jwt_service
            .issue(Some(&user.email))
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(TokenResponse::bearer(access_token))
    }
}
