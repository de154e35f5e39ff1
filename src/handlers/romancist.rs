//! 作者管理的 HTTP 处理器

use crate::{
    auth::CurrentUser,
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    middleware::AppState,
    models::{
        romancist::{Romancist, RomancistFilter, RomancistSchema, RomancistUpdate, RomancistsList},
        sanitize_name, Message,
    },
    repository::{RomancistRepository, ROMANCIST_CONFLICT},
};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

const ROMANCIST_NOT_FOUND: &str = "Romancist not found";

fn normalized_name(raw: &str) -> Result<String, AppError> {
    let name = sanitize_name(raw);
    if name.is_empty() {
        return Err(AppError::validation(
            "name must contain at least one letter or digit",
        ));
    }
    Ok(name)
}

/// 创建作者
pub async fn create_romancist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<RomancistSchema>,
) -> Result<(StatusCode, Json<Romancist>), AppError> {
    req.validate()?;
    let name = normalized_name(&req.name)?;

    let repo = RomancistRepository::new(state.db.clone());
    if repo.find_by_name(&name).await?.is_some() {
        return Err(AppError::conflict(ROMANCIST_CONFLICT));
    }

    let romancist = repo.create(&name).await?;

    tracing::info!(user_id = user.id, romancist_id = romancist.id, "Romancist created");

    Ok((StatusCode::CREATED, Json(romancist)))
}

/// 获取作者详情
pub async fn read_romancist(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Romancist>, AppError> {
    let repo = RomancistRepository::new(state.db.clone());
    let romancist = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(ROMANCIST_NOT_FOUND))?;

    Ok(Json(romancist))
}

/// 按名称子串查询作者
pub async fn read_romancists(
    State(state): State<Arc<AppState>>,
    AppQuery(filter): AppQuery<RomancistFilter>,
) -> Result<Json<RomancistsList>, AppError> {
    filter.validate()?;

    // 存储的名称已规范化，过滤条件同样处理
    let name = filter
        .name
        .as_deref()
        .map(sanitize_name)
        .filter(|name| !name.is_empty());

    let repo = RomancistRepository::new(state.db.clone());
    let romancists = repo
        .search(name.as_deref(), filter.limit, filter.offset)
        .await?;

    Ok(Json(RomancistsList { romancists }))
}

/// 更新作者
pub async fn update_romancist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<RomancistUpdate>,
) -> Result<Json<Romancist>, AppError> {
    req.validate()?;
    let name = req.name.as_deref().map(normalized_name).transpose()?;

    let repo = RomancistRepository::new(state.db.clone());
    let romancist = repo
        .update(id, name.as_deref())
        .await?
        .ok_or_else(|| AppError::not_found(ROMANCIST_NOT_FOUND))?;

    tracing::info!(user_id = user.id, romancist_id = id, "Romancist updated");

    Ok(Json(romancist))
}

/// 删除作者（同时删除其书籍）
pub async fn delete_romancist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Message>, AppError> {
    let repo = RomancistRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::not_found(ROMANCIST_NOT_FOUND));
    }

    tracing::info!(user_id = user.id, romancist_id = id, "Romancist deleted");

    Ok(Json(Message::new("Romancist deleted from the MADR")))
}
