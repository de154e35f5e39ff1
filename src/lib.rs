//! MADR 图书目录服务
//! 作者、书籍与账号管理，基于 JWT 的 Bearer 认证

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
