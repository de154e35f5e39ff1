//! Book repository

use crate::{
    error::AppError,
    models::book::{Book, BookFilter},
};
use sqlx::SqlitePool;

pub const BOOK_CONFLICT: &str = "Book already exists in the MADR";

const BOOK_COLUMNS: &str = "id, title, year, romancist_id";

#[derive(Clone)]
pub struct BookRepository {
    db: SqlitePool,
}

impl BookRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(book)
    }

    pub async fn find_by_title(&self, title: &str) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE title = ?1"
        ))
        .bind(title)
        .fetch_optional(&self.db)
        .await?;

        Ok(book)
    }

    /// 创建书籍（标题需已规范化）
    pub async fn create(&self, title: &str, year: &str, romancist_id: i64) -> Result<Book, AppError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, year, romancist_id) VALUES (?1, ?2, ?3) RETURNING {BOOK_COLUMNS}"
        ))
        .bind(title)
        .bind(year)
        .bind(romancist_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, BOOK_CONFLICT))?;

        Ok(book)
    }

    /// 标题子串 + 年份精确匹配，分页
    pub async fn search(&self, filter: &BookFilter) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {BOOK_COLUMNS} FROM books
            WHERE (?1 IS NULL OR instr(title, ?1) > 0)
              AND (?2 IS NULL OR year = ?2)
            ORDER BY id
            LIMIT ?3 OFFSET ?4
            "#
        ))
        .bind(filter.title.as_deref())
        .bind(filter.year.as_deref())
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.db)
        .await?;

        Ok(books)
    }

    /// 部分更新；为 None 的字段保持原值
    pub async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        year: Option<&str>,
        romancist_id: Option<i64>,
    ) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET
                title = COALESCE(?2, title),
                year = COALESCE(?3, year),
                romancist_id = COALESCE(?4, romancist_id)
            WHERE id = ?1
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(title)
        .bind(year)
        .bind(romancist_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, BOOK_CONFLICT))?;

        Ok(book)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
