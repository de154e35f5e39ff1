//! 认证提取器
//! 受保护的 handler 通过 `CurrentUser` 显式接收已解析的账户

use crate::{error::AppError, middleware::AppState, models::user::User};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::sync::Arc;

/// 当前请求的已认证账户（每个请求解析一次）
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)?;
        let user = state.identity_resolver.resolve(&token).await?;

        tracing::debug!(user_id = user.id, "Request authenticated");

        Ok(CurrentUser(user))
    }
}

/// 从 Authorization 头提取 Bearer 令牌
///
/// 缺少请求头或认证方案不是 Bearer 时返回 `NotAuthenticated`。
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::NotAuthenticated)?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            Ok(token.trim().to_string())
        }
        _ => Err(AppError::NotAuthenticated),
    }
}
