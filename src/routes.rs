//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::{handlers, middleware::AppState};

/// 请求体上限（1 MiB）
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// 创建应用路由
///
/// 受保护的端点通过 `CurrentUser` 提取器完成认证，
/// 因此公开与受保护的方法可以挂在同一路径上。
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（欢迎页与健康检查）
    let public_routes = Router::new()
        .route("/", get(handlers::health::read_root))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 认证
    let auth_routes = Router::new()
        .route("/auth/token", post(handlers::auth::login_for_access_token))
        .route(
            "/auth/refresh_token",
            post(handlers::auth::refresh_access_token),
        );

    // 账号
    let user_routes = Router::new()
        .route(
            "/users/",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::user::get_user)
                .put(handlers::user::update_user)
                .delete(handlers::user::delete_user),
        );

    // 作者与书籍
    let catalog_routes = Router::new()
        .route(
            "/romancists/",
            get(handlers::romancist::read_romancists).post(handlers::romancist::create_romancist),
        )
        .route(
            "/romancists/{id}",
            get(handlers::romancist::read_romancist)
                .patch(handlers::romancist::update_romancist)
                .delete(handlers::romancist::delete_romancist),
        )
        .route(
            "/books/",
            get(handlers::book::read_books).post(handlers::book::create_book),
        )
        .route(
            "/books/{id}",
            get(handlers::book::read_book)
                .patch(handlers::book::update_book)
                .delete(handlers::book::delete_book),
        );

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(user_routes)
        .merge(catalog_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
