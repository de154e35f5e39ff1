//! Romancist (author) models

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Romancist {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RomancistSchema {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct RomancistUpdate {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RomancistsList {
    pub romancists: Vec<Romancist>,
}

/// Query string for `GET /romancists/`
#[derive(Debug, Deserialize, Validate)]
pub struct RomancistFilter {
    pub name: Option<String>,
    #[serde(default = "super::default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: i64,
}
