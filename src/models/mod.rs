//! 数据模型模块
//! 账户、认证、作者与书籍模型，以及名称规范化

pub mod auth;
pub mod book;
pub mod romancist;
pub mod user;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

static DISALLOWED_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9 ]+").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// 规范化名称：去首尾空白、转小写、移除特殊字符、合并连续空白
///
/// 用于用户名、作者名与书名，保证唯一性约束作用于规范形式。
/// 制表符、换行等非空格空白属于特殊字符，会被直接移除。
pub fn sanitize_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let cleaned = DISALLOWED_CHARS.replace_all(&lowered, "");
    WHITESPACE_RUN.replace_all(&cleaned, " ").trim().to_string()
}

/// 通用消息响应
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

pub(crate) fn default_limit() -> i64 {
    20
}

/// 分页参数
#[derive(Debug, Deserialize, Validate)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: i64,
}
