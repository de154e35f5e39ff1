//! 用户管理的 HTTP 处理器

use crate::{
    auth::CurrentUser,
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    middleware::AppState,
    models::{
        sanitize_name,
        user::{UserPublic, UserSchema, UsersList},
        Message, Pagination,
    },
    repository::{UserDirectory, UserRepository},
};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

const ACCOUNT_CONFLICT: &str = "Username or email already exists";

/// 校验请求并返回规范化后的用户名
fn normalized_username(req: &UserSchema) -> Result<String, AppError> {
    req.validate()?;

    let username = sanitize_name(&req.username);
    if username.is_empty() {
        return Err(AppError::validation(
            "username must contain at least one letter or digit",
        ));
    }

    Ok(username)
}

/// 创建用户（公开端点）
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<UserSchema>,
) -> Result<(StatusCode, Json<UserPublic>), AppError> {
    let username = normalized_username(&req)?;

    let repo = UserRepository::new(state.db.clone());
    if repo
        .find_by_username_or_email(&username, &req.email)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(ACCOUNT_CONFLICT));
    }

    let password_hash = state.password_hasher.hash(&req.password)?;
    let user = repo.create(&username, &req.email, &password_hash).await?;

    tracing::info!(user_id = user.id, "Account created");

    Ok((StatusCode::CREATED, Json(UserPublic::from(user))))
}

/// 列出用户
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AppQuery(page): AppQuery<Pagination>,
) -> Result<Json<UsersList>, AppError> {
    page.validate()?;

    let repo = UserRepository::new(state.db.clone());
    let users = repo.list(page.limit, page.offset).await?;

    Ok(Json(UsersList {
        users: users.into_iter().map(UserPublic::from).collect(),
    }))
}

/// 获取用户详情
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<UserPublic>, AppError> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserPublic::from(user)))
}

/// 更新用户（仅限本人）
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(current_user): CurrentUser,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<UserSchema>,
) -> Result<Json<UserPublic>, AppError> {
    if current_user.id != id {
        tracing::warn!(user_id = current_user.id, target_id = id, "Update of foreign account refused");
        return Err(AppError::Forbidden);
    }

    let username = normalized_username(&req)?;

    // 与其他账户的用户名或邮箱冲突由唯一约束报告为 409
    let repo = UserRepository::new(state.db.clone());
    let password_hash = state.password_hasher.hash(&req.password)?;
    let user = repo
        .update(id, &username, &req.email, &password_hash)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    tracing::info!(user_id = user.id, "Account updated");

    Ok(Json(UserPublic::from(user)))
}

/// 删除用户（仅限本人）
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(current_user): CurrentUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Message>, AppError> {
    if current_user.id != id {
        tracing::warn!(user_id = current_user.id, target_id = id, "Deletion of foreign account refused");
        return Err(AppError::Forbidden);
    }

    let repo = UserRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::not_found("User not found"));
    }

    tracing::info!(user_id = id, "Account deleted");

    Ok(Json(Message::new("Account deleted")))
}
