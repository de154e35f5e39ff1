//! 测试公共模块
//! 提供测试辅助函数和测试工具

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use madr::{
    auth::{Clock, ManualClock, PasswordHasher},
    config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig},
    db,
    error::AppError,
    middleware::AppState,
    models::user::User,
    repository::{UserDirectory, UserRepository},
    routes,
};
use secrecy::Secret;
use sqlx::SqlitePool;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 创建测试配置（低成本 Argon2 参数，30 分钟令牌有效期）
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
        },
        database: DatabaseConfig {
            url: Secret::new("sqlite::memory:".to_string()),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 5,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            secret_key: Secret::new(TEST_SECRET.to_string()),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
        },
    }
}

/// 时钟起点（固定值，便于断言 exp）
pub fn test_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// 初始化内存数据库并运行迁移
pub async fn setup_test_db() -> SqlitePool {
    let pool = db::create_memory_pool()
        .await
        .expect("Failed to create test database pool");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// 创建测试应用状态（系统时钟）
pub fn create_test_app_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(create_test_config(), pool).expect("Failed to build app state"))
}

/// 创建测试应用状态，令牌时间由返回的手动时钟控制
pub fn create_test_app_state_with_clock(pool: SqlitePool) -> (Arc<AppState>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(test_epoch()));
    let shared: Arc<dyn Clock> = clock.clone();
    let state = AppState::with_clock(create_test_config(), pool, shared)
        .expect("Failed to build app state");

    (Arc::new(state), clock)
}

pub fn create_app(state: Arc<AppState>) -> Router {
    routes::create_router(state)
}

/// 测试账户（保留明文密码用于登录）
pub struct TestAccount {
    pub user: User,
    pub password: String,
}

/// 直接通过仓储创建账户
pub async fn create_test_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password: &str,
) -> TestAccount {
    let hasher = PasswordHasher::with_params(1024, 1, 1).expect("Failed to build hasher");
    let password_hash = hasher.hash(password).expect("Failed to hash password");

    let user = UserRepository::new(pool.clone())
        .create(username, email, &password_hash)
        .await
        .expect("Failed to create test user");

    TestAccount {
        user,
        password: password.to_string(),
    }
}

/// 通过 /auth/token 登录并返回访问令牌
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(form_request("/auth/token", &[("username", email), ("password", password)]))
        .await
        .unwrap();

    assert_eq!(response.status(), 200, "login should succeed");
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// 构造表单请求
pub fn form_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencode(v)))
        .collect::<Vec<_>>()
        .join("&");

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// 构造 JSON 请求，`token` 存在时附带 Bearer 头
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

/// 构造无请求体的请求
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn urlencode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

/// 内存账户目录，用于不依赖数据库的服务测试
#[derive(Default)]
pub struct InMemoryDirectory {
    users: Mutex<Vec<User>>,
}

impl InMemoryDirectory {
    pub fn with_user(username: &str, email: &str, password_hash: &str) -> Self {
        let directory = Self::default();
        directory.insert(username, email, password_hash);
        directory
    }

    pub fn insert(&self, username: &str, email: &str, password_hash: &str) -> User {
        let mut users = self.users.lock().unwrap();
        let user = User {
            id: users.len() as i64 + 1,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: test_epoch(),
            updated_at: test_epoch(),
        };
        users.push(user.clone());
        user
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }
}

/// 始终失败的账户目录，模拟数据库不可用
pub struct UnavailableDirectory;

#[async_trait]
impl UserDirectory for UnavailableDirectory {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, AppError> {
        Err(AppError::Database(sqlx::Error::PoolClosed))
    }

    async fn find_by_username_or_email(
        &self,
        _username: &str,
        _email: &str,
    ) -> Result<Option<User>, AppError> {
        Err(AppError::Database(sqlx::Error::PoolClosed))
    }
}
