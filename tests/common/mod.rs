#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use kinder::router::init_router;
use kinder::state::AppState;
use kinder_auth::{Role, create_access_token};
use kinder_config::{CorsConfig, JwtConfig};
use kinder_core::hash_password;
use kinder_models::Qualification;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    let state = AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        cors_config: CorsConfig {
            allowed_origins: vec![],
        },
    };
    init_router(state)
}

pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub token: String,
}

pub fn generate_unique_username(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}

/// Inserts an identity directly and issues a token for it.
pub async fn create_test_user(pool: &PgPool, role: Role) -> TestUser {
    let username = generate_unique_username(&role.as_str().to_lowercase());
    let password = "testpass123".to_string();
    let hashed = hash_password(&password).unwrap();

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (username, password, role) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&username)
    .bind(&hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    let token = create_access_token(id, &username, role, &test_jwt_config()).unwrap();

    TestUser {
        id,
        username,
        password,
        role,
        token,
    }
}

pub struct TestProfile {
    pub id: Uuid,
    pub user: TestUser,
}

pub async fn create_test_employee(
    pool: &PgPool,
    qualification: Qualification,
    phone_number: i64,
) -> TestProfile {
    let user = create_test_user(pool, Role::Employee).await;
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO employees (user_id, fname, lname, gender, birthday, phone_number, qualification, work_experience)
         VALUES ($1, 'Anna', 'Petrova', false, '1990-04-12', $2, $3, 5)
         RETURNING id",
    )
    .bind(user.id)
    .bind(phone_number)
    .bind(qualification)
    .fetch_one(pool)
    .await
    .unwrap();

    TestProfile { id, user }
}

pub async fn create_test_parent(pool: &PgPool, phone_number: i64) -> TestProfile {
    let user = create_test_user(pool, Role::Parent).await;
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO parents (user_id, fname, lname, phone_number)
         VALUES ($1, 'Ivan', 'Ivanov', $2)
         RETURNING id",
    )
    .bind(user.id)
    .bind(phone_number)
    .fetch_one(pool)
    .await
    .unwrap();

    TestProfile { id, user }
}

pub async fn create_test_program(pool: &PgPool) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO educational_programs (description, age_category_children)
         VALUES ('Early literacy', 3) RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_group(pool: &PgPool, program_id: Uuid) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO child_groups (name, age_group, educational_program_id)
         VALUES ($1, 'junior', $2) RETURNING id",
    )
    .bind(generate_unique_username("group"))
    .bind(program_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Inserts a child linked to `parent_id` and bumps the group counter.
pub async fn create_test_child(pool: &PgPool, group_id: Uuid, parent_id: Uuid) -> Uuid {
    let child_id: Uuid = sqlx::query_scalar(
        "INSERT INTO children (fname, lname, gender, birthday, group_id, transfer_date)
         VALUES ('Masha', 'Ivanova', false, '2020-02-01', $1, '2023-09-01')
         RETURNING id",
    )
    .bind(group_id)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO parent_children (parent_id, child_id) VALUES ($1, $2)")
        .bind(parent_id)
        .bind(child_id)
        .execute(pool)
        .await
        .unwrap();

    sqlx::query("UPDATE child_groups SET count_children = count_children + 1 WHERE id = $1")
        .bind(group_id)
        .execute(pool)
        .await
        .unwrap();

    child_id
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Sends a request through the router and returns status plus JSON body.
///
/// The body is `Value::Null` when the response has none.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

/// Asserts no key named `password` appears anywhere in `value`.
pub fn assert_no_password(value: &Value) {
    match value {
        Value::Object(map) => {
            assert!(!map.contains_key("password"), "password leaked: {}", value);
            map.values().for_each(assert_no_password);
        }
        Value::Array(items) => items.iter().for_each(assert_no_password),
        _ => {}
    }
}
