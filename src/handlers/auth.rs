//! 认证相关的 HTTP 处理器

use crate::{
    auth::CurrentUser,
    error::AppError,
    extract::AppForm,
    middleware::AppState,
    models::auth::{LoginForm, TokenResponse},
};
use axum::{extract::State, Json};
use std::sync::Arc;

/// 登录（OAuth2 密码模式，表单提交）
pub async fn login_for_access_token(
    State(state): State<Arc<AppState>>,
    AppForm(form): AppForm<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let response = state.auth_service.login(form).await?;

    Ok(Json(response))
}

/// 刷新令牌
pub async fn refresh_access_token(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<TokenResponse>, AppError> {
    let response = state.auth_service.refresh(&user)?;

    Ok(Json(response))
}
