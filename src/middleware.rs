//! HTTP 中间件与应用状态
//! 请求追踪，以及进程启动时一次性构建的共享服务

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    auth::{Clock, IdentityResolver, JwtService, PasswordHasher, SystemClock},
    config::AppConfig,
    error::AppError,
    repository::{UserDirectory, UserRepository},
    services::AuthService,
};

/// 应用状态
///
/// 启动后只读：配置、连接池与 Arc 包装的服务在请求间共享，无需加锁。
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub password_hasher: Arc<PasswordHasher>,
    pub auth_service: Arc<AuthService>,
    pub identity_resolver: Arc<IdentityResolver>,
}

impl AppState {
    pub fn new(config: AppConfig, db: SqlitePool) -> Result<Self, AppError> {
        Self::with_clock(config, db, Arc::new(SystemClock))
    }

    /// 使用指定时钟构建状态（令牌签发与过期判断都基于该时钟）
    pub fn with_clock(
        config: AppConfig,
        db: SqlitePool,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let jwt_service = Arc::new(JwtService::from_config_with_clock(&config, clock)?);
        let password_hasher = Arc::new(PasswordHasher::from_config(&config)?);
        let directory: Arc<dyn UserDirectory> = Arc::new(UserRepository::new(db.clone()));

        let auth_service = Arc::new(AuthService::new(
            directory.clone(),
            password_hasher.clone(),
            jwt_service.clone(),
        ));
        let identity_resolver = Arc::new(IdentityResolver::new(jwt_service.clone(), directory));

        Ok(Self {
            config,
            db,
            jwt_service,
            password_hasher,
            auth_service,
            identity_resolver,
        })
    }
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        // 记录指标 - 使用静态字符串控制标签基数
        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            "PATCH" => "PATCH",
            _ => "UNKNOWN",
        };
        let status_class = match status {
            200..=299 => "2xx",
            300..=399 => "3xx",
            400..=499 => "4xx",
            _ => "5xx",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_class)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        // 在响应头中回显 trace_id / request_id
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty() && s.len() <= 128)
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
