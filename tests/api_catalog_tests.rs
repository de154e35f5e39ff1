//! 作者与书籍 API 集成测试

use axum::{http::StatusCode, Router};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{
    body_json, create_app, create_test_app_state, create_test_user, empty_request, json_request,
    login, setup_test_db,
};

/// 启动应用并返回已登录账户的令牌
async fn authed_app() -> (Router, String) {
    let pool = setup_test_db().await;
    create_test_user(&pool, "reader", "reader@x.com", "secret").await;
    let app = create_app(create_test_app_state(pool));
    let token = login(&app, "reader@x.com", "secret").await;
    (app, token)
}

async fn create_romancist(app: &Router, token: &str, name: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/romancists/",
            Some(token),
            &json!({"name": name}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn create_book(app: &Router, token: &str, title: &str, year: &str, romancist_id: i64) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/books/",
            Some(token),
            &json!({"title": title, "year": year, "romancist_id": romancist_id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ==================== 作者 ====================

#[tokio::test]
async fn test_create_romancist_normalizes_name() {
    let (app, token) = authed_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/romancists/",
            Some(&token),
            &json!({"name": "  Machado   de Assis! "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "machado de assis");
}

#[tokio::test]
async fn test_create_romancist_requires_token() {
    let pool = setup_test_db().await;
    let app = create_app(create_test_app_state(pool));

    let response = app
        .oneshot(json_request(
            "POST",
            "/romancists/",
            None,
            &json!({"name": "Clarice Lispector"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["detail"], "Not authenticated");
}

#[tokio::test]
async fn test_create_duplicate_romancist() {
    let (app, token) = authed_app().await;
    create_romancist(&app, &token, "Clarice Lispector").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/romancists/",
            Some(&token),
            &json!({"name": "CLARICE  lispector"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["detail"],
        "Romancist already exists in the MADR"
    );
}

#[tokio::test]
async fn test_read_romancists_filters_by_name() {
    let (app, token) = authed_app().await;
    create_romancist(&app, &token, "Machado de Assis").await;
    create_romancist(&app, &token, "Clarice Lispector").await;
    create_romancist(&app, &token, "Manuel Bandeira").await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/romancists/?name=Ma", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["romancists"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["machado de assis", "manuel bandeira"]);

    let response = app
        .oneshot(empty_request("GET", "/romancists/?limit=2&offset=2", None))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["romancists"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_read_missing_romancist() {
    let (app, _) = authed_app().await;

    let response = app
        .oneshot(empty_request("GET", "/romancists/42", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Romancist not found");
}

#[tokio::test]
async fn test_update_romancist() {
    let (app, token) = authed_app().await;
    let id = create_romancist(&app, &token, "Machado").await;
    create_romancist(&app, &token, "Clarice Lispector").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/romancists/{}", id),
            Some(&token),
            &json!({"name": "Machado de Assis"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "machado de assis");

    // 改成已存在的名称
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/romancists/{}", id),
            Some(&token),
            &json!({"name": "clarice lispector"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/romancists/999",
            Some(&token),
            &json!({"name": "nobody"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_romancist_cascades_to_books() {
    let (app, token) = authed_app().await;
    let romancist_id = create_romancist(&app, &token, "Machado de Assis").await;
    let book_id = create_book(&app, &token, "Dom Casmurro", "1899", romancist_id).await;

    let response = app
        .clone()
        .oneshot(empty_request(
            "DELETE",
            &format!("/romancists/{}", romancist_id),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Romancist deleted from the MADR"
    );

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/books/{}", book_id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request(
            "DELETE",
            &format!("/romancists/{}", romancist_id),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ==================== 书籍 ====================

#[tokio::test]
async fn test_create_book() {
    let (app, token) = authed_app().await;
    let romancist_id = create_romancist(&app, &token, "Machado de Assis").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/books/",
            Some(&token),
            &json!({"title": "Dom Casmurro!", "year": "1899", "romancist_id": romancist_id}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "dom casmurro");
    assert_eq!(json["year"], "1899");
    assert_eq!(json["romancist_id"], romancist_id);
}

#[tokio::test]
async fn test_create_book_for_missing_romancist() {
    let (app, token) = authed_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/books/",
            Some(&token),
            &json!({"title": "Orphan", "year": "2000", "romancist_id": 7}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Romancist not found");
}

#[tokio::test]
async fn test_create_duplicate_book() {
    let (app, token) = authed_app().await;
    let romancist_id = create_romancist(&app, &token, "Machado de Assis").await;
    create_book(&app, &token, "Dom Casmurro", "1899", romancist_id).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/books/",
            Some(&token),
            &json!({"title": "dom   CASMURRO", "year": "1900", "romancist_id": romancist_id}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["detail"],
        "Book already exists in the MADR"
    );
}

#[tokio::test]
async fn test_read_books_filters() {
    let (app, token) = authed_app().await;
    let romancist_id = create_romancist(&app, &token, "Machado de Assis").await;
    create_book(&app, &token, "Dom Casmurro", "1899", romancist_id).await;
    create_book(&app, &token, "Memorias Postumas de Bras Cubas", "1881", romancist_id).await;
    create_book(&app, &token, "Quincas Borba", "1891", romancist_id).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/books/?title=as", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["books"].as_array().unwrap().len(), 3);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/books/?title=as&year=1881", None))
        .await
        .unwrap();
    let json = body_json(response).await;
    let books = json["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "memorias postumas de bras cubas");

    let response = app
        .oneshot(empty_request("GET", "/books/?limit=101", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_book() {
    let (app, token) = authed_app().await;
    let machado = create_romancist(&app, &token, "Machado de Assis").await;
    let clarice = create_romancist(&app, &token, "Clarice Lispector").await;
    let book_id = create_book(&app, &token, "A Hora da Estrela", "1976", machado).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/books/{}", book_id),
            Some(&token),
            &json!({"year": "1977", "romancist_id": clarice}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "a hora da estrela");
    assert_eq!(json["year"], "1977");
    assert_eq!(json["romancist_id"], clarice);

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/books/{}", book_id),
            Some(&token),
            &json!({"romancist_id": 999}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Romancist not found");

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/books/999",
            Some(&token),
            &json!({"year": "2000"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Book not found");
}

#[tokio::test]
async fn test_delete_book() {
    let (app, token) = authed_app().await;
    let romancist_id = create_romancist(&app, &token, "Machado de Assis").await;
    let book_id = create_book(&app, &token, "Dom Casmurro", "1899", romancist_id).await;

    let response = app
        .clone()
        .oneshot(empty_request(
            "DELETE",
            &format!("/books/{}", book_id),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Book deleted");

    let response = app
        .oneshot(empty_request(
            "DELETE",
            &format!("/books/{}", book_id),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
