//! HTTP 处理器模块

pub mod auth;
pub mod book;
pub mod health;
pub mod romancist;
pub mod user;
