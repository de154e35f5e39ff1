//! Book models

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub year: String,
    pub romancist_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BookSchema {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 16, message = "year must be 1-16 characters"))]
    pub year: String,
    pub romancist_id: i64,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize, Validate)]
pub struct BookUpdate {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 16, message = "year must be 1-16 characters"))]
    pub year: Option<String>,
    pub romancist_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BooksList {
    pub books: Vec<Book>,
}

/// Query string for `GET /books/`
#[derive(Debug, Deserialize, Validate)]
pub struct BookFilter {
    pub title: Option<String>,
    pub year: Option<String>,
    #[serde(default = "super::default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: i64,
}
