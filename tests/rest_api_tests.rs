use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use pvz_service::adapter::driven::{BcryptPasswordHasher, InMemoryStore, JwtTokenService};
use pvz_service::adapter::driver::{create_router, AppState};
use pvz_service::domain::model::{Principal, Role, UserId};
use pvz_service::domain::port::TokenService;
use serde_json::{json, Value};

use std::sync::Arc;

fn test_server() -> TestServer {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store,
        Arc::new(JwtTokenService::new("rest-api-test-secret", 1)),
        Arc::new(BcryptPasswordHasher::new(BcryptPasswordHasher::MIN_COST)),
    );
    TestServer::new(create_router(state)).unwrap()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

async fn dummy_token(server: &TestServer, role: &str) -> String {
    let response = server
        .post("/dummyLogin")
        .json(&json!({ "role": role }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_point(server: &TestServer, moderator: &str) -> String {
    let response = server
        .post("/pvz")
        .add_header(AUTHORIZATION, bearer(moderator))
        .json(&json!({ "city": "Москва" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

async fn open_reception(server: &TestServer, employee: &str, pvz_id: &str) -> TestResponse {
    server
        .post("/receptions")
        .add_header(AUTHORIZATION, bearer(employee))
        .json(&json!({ "pvzId": pvz_id }))
        .await
}

async fn add_product(
    server: &TestServer,
    employee: &str,
    pvz_id: &str,
    product_type: &str,
) -> TestResponse {
    server
        .post("/products")
        .add_header(AUTHORIZATION, bearer(employee))
        .json(&json!({ "type": product_type, "pvzId": pvz_id }))
        .await
}

fn error_code(response: &TestResponse) -> String {
    response.json::<Value>()["code"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_check_reports_healthy() {
    let server = test_server();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn dummy_login_rejects_unknown_role() {
    let server = test_server();

    let response = server
        .post("/dummyLogin")
        .json(&json!({ "role": "admin" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "VALIDATION_ERROR");
}

#[tokio::test]
async fn protected_endpoints_require_token() {
    let server = test_server();

    let missing = server.get("/pvz").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&missing), "UNAUTHORIZED");

    let garbage = server
        .get("/pvz")
        .add_header(AUTHORIZATION, bearer("not-a-jwt"))
        .await;
    assert_eq!(garbage.status_code(), StatusCode::UNAUTHORIZED);

    let wrong_scheme = server
        .get("/pvz")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"))
        .await;
    assert_eq!(wrong_scheme.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() {
    let server = test_server();
    let foreign = JwtTokenService::new("some-other-secret", 1);
    let token = foreign
        .issue(&Principal::new(UserId::new(), Role::Moderator))
        .unwrap();

    let response = server
        .post("/pvz")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "city": "Казань" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn only_moderator_creates_pickup_points() {
    let server = test_server();
    let employee = dummy_token(&server, "employee").await;
    let moderator = dummy_token(&server, "moderator").await;

    let forbidden = server
        .post("/pvz")
        .add_header(AUTHORIZATION, bearer(&employee))
        .json(&json!({ "city": "Москва" }))
        .await;
    assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(&forbidden), "FORBIDDEN");

    let created = server
        .post("/pvz")
        .add_header(AUTHORIZATION, bearer(&moderator))
        .json(&json!({ "city": "Санкт-Петербург" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let body = created.json::<Value>();
    assert_eq!(body["city"], "Санкт-Петербург");
    assert!(body["registrationDate"].is_string());
}

#[tokio::test]
async fn unsupported_city_is_validation_error() {
    let server = test_server();
    let moderator = dummy_token(&server, "moderator").await;

    let response = server
        .post("/pvz")
        .add_header(AUTHORIZATION, bearer(&moderator))
        .json(&json!({ "city": "Новосибирск" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "VALIDATION_ERROR");
}

#[tokio::test]
async fn reception_lifecycle_over_http() {
    let server = test_server();
    let moderator = dummy_token(&server, "moderator").await;
    let employee = dummy_token(&server, "employee").await;
    let pvz_id = create_point(&server, &moderator).await;

    // 受付の開始
    let opened = open_reception(&server, &employee, &pvz_id).await;
    assert_eq!(opened.status_code(), StatusCode::CREATED);
    let reception = opened.json::<Value>();
    assert_eq!(reception["status"], "in_progress");
    assert_eq!(reception["pvzId"], pvz_id.as_str());

    // 二重開始は競合
    let conflict = open_reception(&server, &employee, &pvz_id).await;
    assert_eq!(conflict.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&conflict), "CONFLICT");

    // 商品の追加
    let added = add_product(&server, &employee, &pvz_id, "электроника").await;
    assert_eq!(added.status_code(), StatusCode::CREATED);
    let product = added.json::<Value>();
    assert_eq!(product["type"], "электроника");
    assert_eq!(product["receptionId"], reception["id"]);

    // 商品の削除
    let deleted = server
        .post(&format!("/pvz/{}/delete_last_product", pvz_id))
        .add_header(AUTHORIZATION, bearer(&employee))
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let nothing_left = server
        .post(&format!("/pvz/{}/delete_last_product", pvz_id))
        .add_header(AUTHORIZATION, bearer(&employee))
        .await;
    assert_eq!(nothing_left.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&nothing_left), "NOT_FOUND");

    // 受付の終了
    let closed = server
        .post(&format!("/pvz/{}/close_last_reception", pvz_id))
        .add_header(AUTHORIZATION, bearer(&employee))
        .await;
    assert_eq!(closed.status_code(), StatusCode::OK);
    assert_eq!(closed.json::<Value>()["status"], "close");

    let after_close = add_product(&server, &employee, &pvz_id, "обувь").await;
    assert_eq!(after_close.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&after_close), "NOT_FOUND");
}

#[tokio::test]
async fn moderator_cannot_open_reception_or_add_products() {
    let server = test_server();
    let moderator = dummy_token(&server, "moderator").await;
    let pvz_id = create_point(&server, &moderator).await;

    let open = open_reception(&server, &moderator, &pvz_id).await;
    assert_eq!(open.status_code(), StatusCode::FORBIDDEN);

    let add = add_product(&server, &moderator, &pvz_id, "одежда").await;
    assert_eq!(add.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_identifiers_are_validation_errors() {
    let server = test_server();
    let employee = dummy_token(&server, "employee").await;

    let open = open_reception(&server, &employee, "not-a-uuid").await;
    assert_eq!(open.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&open), "VALIDATION_ERROR");

    let close = server
        .post("/pvz/not-a-uuid/close_last_reception")
        .add_header(AUTHORIZATION, bearer(&employee))
        .await;
    assert_eq!(close.status_code(), StatusCode::BAD_REQUEST);

    let missing_field = server
        .post("/products")
        .add_header(AUTHORIZATION, bearer(&employee))
        .json(&json!({ "type": "обувь" }))
        .await;
    assert_eq!(missing_field.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&missing_field), "VALIDATION_ERROR");
}

#[tokio::test]
async fn open_reception_on_unknown_point_is_rejected() {
    let server = test_server();
    let employee = dummy_token(&server, "employee").await;

    let response = open_reception(&server, &employee, &uuid::Uuid::new_v4().to_string()).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "VALIDATION_ERROR");
}

#[tokio::test]
async fn list_pickup_points_pages_and_counts() {
    let server = test_server();
    let moderator = dummy_token(&server, "moderator").await;
    let employee = dummy_token(&server, "employee").await;
    for _ in 0..3 {
        create_point(&server, &moderator).await;
    }

    let response = server
        .get("/pvz")
        .add_header(AUTHORIZATION, bearer(&employee))
        .add_query_param("page", 2)
        .add_query_param("limit", 1)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("x-total-count"), "3");
    let items = response.json::<Value>();
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert!(items[0]["pvz"]["id"].is_string());
    assert!(items[0]["receptions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_pickup_points_filters_by_registration_date() {
    let server = test_server();
    let moderator = dummy_token(&server, "moderator").await;
    create_point(&server, &moderator).await;

    let future = server
        .get("/pvz")
        .add_header(AUTHORIZATION, bearer(&moderator))
        .add_query_param("startDate", "2999-01-01T00:00:00Z")
        .await;
    assert_eq!(future.status_code(), StatusCode::OK);
    assert_eq!(future.header("x-total-count"), "0");
    assert!(future.json::<Value>().as_array().unwrap().is_empty());

    // 解釈できない日付は無視される
    let malformed = server
        .get("/pvz")
        .add_header(AUTHORIZATION, bearer(&moderator))
        .add_query_param("startDate", "yesterday")
        .await;
    assert_eq!(malformed.status_code(), StatusCode::OK);
    assert_eq!(malformed.header("x-total-count"), "1");
}

#[tokio::test]
async fn list_pickup_points_rejects_out_of_range_paging() {
    let server = test_server();
    let employee = dummy_token(&server, "employee").await;

    let too_large = server
        .get("/pvz")
        .add_header(AUTHORIZATION, bearer(&employee))
        .add_query_param("limit", 31)
        .await;
    assert_eq!(too_large.status_code(), StatusCode::BAD_REQUEST);

    let zero_page = server
        .get("/pvz")
        .add_header(AUTHORIZATION, bearer(&employee))
        .add_query_param("page", 0)
        .await;
    assert_eq!(zero_page.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_then_login_issues_usable_token() {
    let server = test_server();

    let registered = server
        .post("/register")
        .json(&json!({
            "email": "moderator@example.com",
            "password": "s3cret-pass",
            "role": "moderator"
        }))
        .await;
    assert_eq!(registered.status_code(), StatusCode::CREATED);
    let user = registered.json::<Value>();
    assert_eq!(user["email"], "moderator@example.com");
    assert_eq!(user["role"], "moderator");
    assert!(user.get("password").is_none());

    let duplicate = server
        .post("/register")
        .json(&json!({
            "email": "moderator@example.com",
            "password": "another-pass",
            "role": "employee"
        }))
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&duplicate), "VALIDATION_ERROR");

    let wrong_password = server
        .post("/login")
        .json(&json!({ "email": "moderator@example.com", "password": "wrong-pass" }))
        .await;
    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);

    let login = server
        .post("/login")
        .json(&json!({ "email": "moderator@example.com", "password": "s3cret-pass" }))
        .await;
    assert_eq!(login.status_code(), StatusCode::OK);
    let token = login.json::<Value>()["token"].as_str().unwrap().to_string();

    let created = server
        .post("/pvz")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "city": "Казань" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
}
