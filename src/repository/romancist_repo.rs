//! Romancist repository

use crate::{error::AppError, models::romancist::Romancist};
use sqlx::SqlitePool;

pub const ROMANCIST_CONFLICT: &str = "Romancist already exists in the MADR";

#[derive(Clone)]
pub struct RomancistRepository {
    db: SqlitePool,
}

impl RomancistRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Romancist>, AppError> {
        let romancist =
            sqlx::query_as::<_, Romancist>("SELECT id, name FROM romancists WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?;

        Ok(romancist)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Romancist>, AppError> {
        let romancist =
            sqlx::query_as::<_, Romancist>("SELECT id, name FROM romancists WHERE name = ?1")
                .bind(name)
                .fetch_optional(&self.db)
                .await?;

        Ok(romancist)
    }

    /// 创建作者（名称需已规范化）
    pub async fn create(&self, name: &str) -> Result<Romancist, AppError> {
        let romancist = sqlx::query_as::<_, Romancist>(
            "INSERT INTO romancists (name) VALUES (?1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, ROMANCIST_CONFLICT))?;

        Ok(romancist)
    }

    /// 按名称子串过滤并分页
    pub async fn search(
        &self,
        name: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Romancist>, AppError> {
        let romancists = sqlx::query_as::<_, Romancist>(
            r#"
            SELECT id, name FROM romancists
            WHERE (?1 IS NULL OR instr(name, ?1) > 0)
            ORDER BY id
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(name)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(romancists)
    }

    /// 更新作者名称；`name` 为 None 时保持原值
    pub async fn update(&self, id: i64, name: Option<&str>) -> Result<Option<Romancist>, AppError> {
        let romancist = sqlx::query_as::<_, Romancist>(
            r#"
            UPDATE romancists
            SET name = COALESCE(?2, name)
            WHERE id = ?1
            RETURNING id, name
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, ROMANCIST_CONFLICT))?;

        Ok(romancist)
    }

    /// 删除作者（书籍由外键级联删除）
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM romancists WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
