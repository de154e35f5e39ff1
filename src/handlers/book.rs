//! 书籍管理的 HTTP 处理器

use crate::{
    auth::CurrentUser,
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    middleware::AppState,
    models::{
        book::{Book, BookFilter, BookSchema, BookUpdate, BooksList},
        sanitize_name, Message,
    },
    repository::{BookRepository, RomancistRepository, BOOK_CONFLICT},
};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

const BOOK_NOT_FOUND: &str = "Book not found";

fn normalized_title(raw: &str) -> Result<String, AppError> {
    let title = sanitize_name(raw);
    if title.is_empty() {
        return Err(AppError::validation(
            "title must contain at least one letter or digit",
        ));
    }
    Ok(title)
}

async fn ensure_romancist_exists(state: &AppState, romancist_id: i64) -> Result<(), AppError> {
    RomancistRepository::new(state.db.clone())
        .find_by_id(romancist_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("Romancist not found"))
}

/// 创建书籍
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    AppJson(req): AppJson<BookSchema>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    req.validate()?;
    let title = normalized_title(&req.title)?;

    let repo = BookRepository::new(state.db.clone());
    if repo.find_by_title(&title).await?.is_some() {
        return Err(AppError::conflict(BOOK_CONFLICT));
    }

    ensure_romancist_exists(&state, req.romancist_id).await?;

    let book = repo.create(&title, req.year.trim(), req.romancist_id).await?;

    tracing::info!(user_id = user.id, book_id = book.id, "Book created");

    Ok((StatusCode::CREATED, Json(book)))
}

/// 获取书籍详情
pub async fn read_book(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Book>, AppError> {
    let repo = BookRepository::new(state.db.clone());
    let book = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(BOOK_NOT_FOUND))?;

    Ok(Json(book))
}

/// 按标题子串和年份查询书籍
pub async fn read_books(
    State(state): State<Arc<AppState>>,
    AppQuery(mut filter): AppQuery<BookFilter>,
) -> Result<Json<BooksList>, AppError> {
    filter.validate()?;

    filter.title = filter
        .title
        .as_deref()
        .map(sanitize_name)
        .filter(|title| !title.is_empty());
    filter.year = filter
        .year
        .map(|year| year.trim().to_string())
        .filter(|year| !year.is_empty());

    let repo = BookRepository::new(state.db.clone());
    let books = repo.search(&filter).await?;

    Ok(Json(BooksList { books }))
}

/// 部分更新书籍
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<BookUpdate>,
) -> Result<Json<Book>, AppError> {
    req.validate()?;
    let title = req.title.as_deref().map(normalized_title).transpose()?;

    let repo = BookRepository::new(state.db.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(BOOK_NOT_FOUND));
    }

    if let Some(romancist_id) = req.romancist_id {
        ensure_romancist_exists(&state, romancist_id).await?;
    }

    let book = repo
        .update(
            id,
            title.as_deref(),
            req.year.as_deref().map(str::trim),
            req.romancist_id,
        )
        .await?
        .ok_or_else(|| AppError::not_found(BOOK_NOT_FOUND))?;

    tracing::info!(user_id = user.id, book_id = id, "Book updated");

    Ok(Json(book))
}

/// 删除书籍
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Message>, AppError> {
    let repo = BookRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::not_found(BOOK_NOT_FOUND));
    }

    tracing::info!(user_id = user.id, book_id = id, "Book deleted");

    Ok(Json(Message::new("Book deleted")))
}
