use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use timeline::{
    AccountId, JwtClaims, JwtConfig, JwtSessionProvider, Role, SessionConfig,
    SqliteRepositoryProvider, Timeline,
};
use timeline_core::repositories::{AccountRepository, AccountRepositoryProvider};
use tower::ServiceExt;

const TEST_HS256_SECRET: &[u8] = b"http_flow_test_secret_for_hs256_tokens_not_for_production";

async fn setup() -> (Router, Arc<SqliteRepositoryProvider>) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let repositories = Arc::new(SqliteRepositoryProvider::new(pool));

    let timeline = Timeline::new(
        repositories.clone(),
        JwtConfig::new_hs256(TEST_HS256_SECRET.to_vec()),
    );
    timeline.migrate().await.unwrap();

    (timeline_axum::create_router(Arc::new(timeline)), repositories)
}

async fn api(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let body = match body {
        Some(value) => Body::from(serde_json::to_string(&value).unwrap()),
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn register(router: &Router, email: &str) -> String {
    let (status, body) = api(
        router,
        "POST",
        "/auth/register",
        None,
        Some(json!({"fullName": "Alice", "email": email, "password": "hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    body["data"]["accessToken"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_root_and_health() {
    let (router, _) = setup().await;

    let (status, body) = api(&router, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK", "message": "Timeline API is running"}));

    let (status, body) = api(&router, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_sign_in_lockout_over_http() {
    let (router, repositories) = setup().await;

    let (status, body) = api(
        &router,
        "POST",
        "/auth/register",
        None,
        Some(json!({"fullName": "Alice", "email": "alice@example.com", "password": "hunter2", "role": "MANAGER"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["data"]["user"]["role"], "MANAGER");
    assert_eq!(body["data"]["user"]["emailConfirmed"], false);
    assert!(body["data"]["user"].get("password").is_none());
    assert!(body["data"]["user"].get("passwordHash").is_none());
    let token = body["data"]["accessToken"].as_str().unwrap().to_string();

    let (status, me) = api(&router, "GET", "/auth/authenticated-user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "alice@example.com");
    assert_eq!(me["_id"], me["id"].to_string());

    let wrong = json!({"email": "alice@example.com", "password": "wrong"});
    for expected in 1..=4 {
        let (status, body) = api(&router, "POST", "/auth/sign-in", None, Some(wrong.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");
        assert_eq!(body["failedLoginAttempts"], expected);
        assert_eq!(body["accountLocked"], false);
    }

    let (status, body) = api(&router, "POST", "/auth/sign-in", None, Some(wrong.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["failedLoginAttempts"], 5);
    assert_eq!(body["accountLocked"], true);

    let right = json!({"email": "alice@example.com", "password": "hunter2"});
    let (status, body) = api(&router, "POST", "/auth/sign-in", None, Some(right.clone())).await;
    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(body["error"], "Account locked");
    assert!(body["lockUntil"].is_string());

    // Let the lock lapse
    let accounts = repositories.account();
    let mut account = accounts
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    account.lock_until = Some(Utc::now() - Duration::seconds(1));
    accounts.update(&account).await.unwrap();

    let (status, body) = api(&router, "POST", "/auth/sign-in", None, Some(right)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["user"]["failedLoginAttempts"], 0);
    assert_eq!(body["data"]["user"]["lockUntil"], Value::Null);
    assert!(body["data"]["user"]["lastLogin"].is_string());
}

#[tokio::test]
async fn test_unknown_email_and_missing_fields() {
    let (router, _) = setup().await;

    let (status, body) = api(
        &router,
        "POST",
        "/auth/sign-in",
        None,
        Some(json!({"email": "nobody@example.com", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
    assert!(body.get("failedLoginAttempts").is_none());

    let (status, body) = api(
        &router,
        "POST",
        "/auth/sign-in",
        None,
        Some(json!({"email": "nobody@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad request");

    let (status, _) = api(
        &router,
        "POST",
        "/auth/register",
        None,
        Some(json!({"fullName": "NoPassword", "email": "np@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_registration() {
    let (router, _) = setup().await;
    register(&router, "dup@example.com").await;

    let (status, body) = api(
        &router,
        "POST",
        "/auth/register",
        None,
        Some(json!({"fullName": "Other", "email": "dup@example.com", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Email already in use", "error": "Duplicate email"}));
}

#[tokio::test]
async fn test_authenticated_user_rejections() {
    let (router, _) = setup().await;

    let (status, body) = api(&router, "GET", "/auth/authenticated-user", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token provided");

    let (status, body) = api(
        &router,
        "GET",
        "/auth/authenticated-user",
        Some("not.a.token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
    assert_eq!(body["error"], "Unauthorized");

    let token = register(&router, "gone@example.com").await;
    let (_, users) = api(&router, "GET", "/users", Some(&token), None).await;
    let id = users["data"][0]["id"].as_i64().unwrap();
    let (status, _) = api(&router, "DELETE", &format!("/users/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = api(&router, "GET", "/auth/authenticated-user", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_user_crud() {
    let (router, _) = setup().await;

    let (status, _) = api(&router, "GET", "/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, created) = api(
        &router,
        "POST",
        "/users",
        None,
        Some(json!({"fullName": "Bob", "email": "bob@example.com", "password": "pw", "role": "SUPERUSER"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["role"], "USER");
    let id = created["data"]["id"].as_i64().unwrap();

    let token = register(&router, "admin@example.com").await;

    let (status, list) = api(&router, "GET", "/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"].as_array().unwrap().len(), 2);

    let (status, updated) = api(
        &router,
        "PATCH",
        &format!("/users/{id}"),
        Some(&token),
        Some(json!({"fullName": "Robert", "role": "NOT_A_ROLE", "emailConfirmed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["fullName"], "Robert");
    assert_eq!(updated["data"]["role"], "USER");
    assert_eq!(updated["data"]["emailConfirmed"], true);
    assert_eq!(updated["data"]["email"], "bob@example.com");

    let (status, body) = api(
        &router,
        "PATCH",
        &format!("/users/{id}"),
        Some(&token),
        Some(json!({"email": "admin@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Duplicate email");

    let (status, body) = api(&router, "DELETE", &format!("/users/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "User deleted successfully");

    let (status, body) = api(&router, "GET", &format!("/users/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, _) = api(&router, "GET", "/users/not-a-number", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_customer_crud() {
    let (router, _) = setup().await;
    let token = register(&router, "staff@example.com").await;

    let (status, created) = api(
        &router,
        "POST",
        "/customers",
        None,
        Some(json!({"firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com", "city": "London"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["_id"], id.to_string());
    assert_eq!(created["data"]["postalCode"], Value::Null);

    let (status, _) = api(
        &router,
        "POST",
        "/customers",
        None,
        Some(json!({"firstName": "Ada", "lastName": "Again", "email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api(&router, "GET", &format!("/customers/{id}"), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, updated) = api(
        &router,
        "PATCH",
        &format!("/customers/{id}"),
        Some(&token),
        Some(json!({"postalCode": "NW1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["postalCode"], "NW1");
    assert_eq!(updated["data"]["city"], "London");

    let (status, list) = api(&router, "GET", "/customers", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let (status, body) = api(&router, "DELETE", &format!("/customers/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Customer deleted successfully");

    let (status, body) = api(&router, "DELETE", &format!("/customers/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Customer not found");
}

#[tokio::test]
async fn test_product_crud() {
    let (router, _) = setup().await;
    let token = register(&router, "staff@example.com").await;

    let (status, created) = api(
        &router,
        "POST",
        "/products",
        None,
        Some(json!({"name": "Widget", "price": 9.5})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Widget");
    let id = created["id"].as_i64().unwrap();

    let (status, list) = api(&router, "GET", "/products", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, replaced) = api(
        &router,
        "PUT",
        &format!("/products/{id}"),
        Some(&token),
        Some(json!({"name": "Gadget", "description": "Shiny", "price": 12.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["name"], "Gadget");
    assert_eq!(replaced["description"], "Shiny");

    let (status, _) = api(
        &router,
        "POST",
        "/products",
        None,
        Some(json!({"name": "Broken", "price": -1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = api(&router, "DELETE", &format!("/products/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Product deleted"}));

    let (status, body) = api(&router, "GET", &format!("/products/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_token_expired_seconds_ago_is_rejected() {
    let (router, _) = setup().await;

    let (_, body) = api(
        &router,
        "POST",
        "/auth/register",
        None,
        Some(json!({"fullName": "Alice", "email": "alice@example.com", "password": "hunter2"})),
    )
    .await;
    let account_id = AccountId::new(body["data"]["user"]["id"].as_i64().unwrap());

    let sessions = JwtSessionProvider::new(
        JwtConfig::new_hs256(TEST_HS256_SECRET.to_vec()),
        SessionConfig::default(),
    );
    let now = Utc::now();
    let expired = sessions
        .sign(&JwtClaims {
            account_id,
            role: Role::User,
            iat: (now - Duration::hours(1)).timestamp(),
            exp: (now - Duration::seconds(30)).timestamp(),
            iss: None,
        })
        .unwrap();

    let (status, body) = api(
        &router,
        "GET",
        "/auth/authenticated-user",
        Some(expired.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    let (status, _) = api(&router, "GET", "/users", Some(expired.as_str()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_string_role_falls_back_to_user() {
    let (router, _) = setup().await;

    for (email, role) in [
        ("five@example.com", json!(5)),
        ("list@example.com", json!(["ADMIN"])),
        ("null@example.com", Value::Null),
    ] {
        let (status, body) = api(
            &router,
            "POST",
            "/auth/register",
            None,
            Some(json!({"fullName": "Eve", "email": email, "password": "hunter2", "role": role})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "register with role {role}: {body}");
        assert_eq!(body["data"]["user"]["role"], "USER");
    }

    let (status, created) = api(
        &router,
        "POST",
        "/users",
        None,
        Some(json!({"fullName": "Mallory", "email": "mallory@example.com", "password": "pw", "role": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["role"], "USER");
}

#[tokio::test]
async fn test_non_string_role_on_update_keeps_stored_role() {
    let (router, _) = setup().await;

    let (_, created) = api(
        &router,
        "POST",
        "/users",
        None,
        Some(json!({"fullName": "Bob", "email": "bob@example.com", "password": "pw", "role": "MANAGER"})),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let token = register(&router, "admin@example.com").await;

    let (status, updated) = api(
        &router,
        "PATCH",
        &format!("/users/{id}"),
        Some(&token),
        Some(json!({"role": {"name": "ADMIN"}, "fullName": "Robert"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["role"], "MANAGER");
    assert_eq!(updated["data"]["fullName"], "Robert");
}
