mod common;

use axum::http::StatusCode;
use common::{
    assert_no_password, count_rows, create_test_employee, create_test_parent, create_test_user,
    send, setup_test_app,
};
use kinder_auth::Role;
use kinder_models::Qualification;
use serde_json::{Value, json};
use sqlx::PgPool;

fn employee_payload(username: &str, phone: i64, qualification: &str) -> Value {
    json!({
        "user": { "username": username, "password": "pw" },
        "employee": {
            "fname": "Anna",
            "lname": "Petrova",
            "gender": false,
            "birthday": "1990-04-12",
            "phone_number": phone,
            "qualification": qualification,
            "work_experience": 5
        }
    })
}

fn parent_payload(username: &str, phone: i64) -> Value {
    json!({
        "user": { "username": username, "password": "pw" },
        "parent": {
            "fname": "Ivan",
            "lname": "Ivanov",
            "patronymic": "Petrovich",
            "phone_number": phone
        }
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_employee_creates_identity_and_profile(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/api/employee/add/",
        Some(&admin.token),
        Some(employee_payload("teacher1", 89001234567, "teacher")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["fname"], "Anna");
    assert_eq!(body["qualification"], "teacher");
    assert_eq!(body["user"]["username"], "teacher1");
    assert_eq!(body["user"]["role"], "Employee");
    assert_eq!(body["user_id"], body["user"]["id"]);
    assert_no_password(&body);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_employee_requires_admin(pool: PgPool) {
    let employee = create_test_user(&pool, Role::Employee).await;
    let app = setup_test_app(pool.clone());

    let (status, _) = send(
        &app,
        "POST",
        "/api/employee/add/",
        Some(&employee.token),
        Some(employee_payload("teacher1", 89001234567, "teacher")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/api/employee/add/",
        None,
        Some(employee_payload("teacher1", 89001234567, "teacher")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_employee_invalid_phone_creates_nothing(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/api/employee/add/",
        Some(&admin.token),
        Some(employee_payload("teacher1", 79001234567, "teacher")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["employee.phone_number"].is_array());
    assert_eq!(count_rows(&pool, "employees").await, 0);
    // Only the admin identity exists
    assert_eq!(count_rows(&pool, "users").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_employee_duplicate_phone_rolls_back_identity(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    create_test_employee(&pool, Qualification::Methodist, 89001234567).await;
    let app = setup_test_app(pool.clone());
    let users_before = count_rows(&pool, "users").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/employee/add/",
        Some(&admin.token),
        Some(employee_payload("teacher2", 89001234567, "teacher")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["phone_number"].is_array());
    assert_eq!(count_rows(&pool, "users").await, users_before);

    let orphan: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = 'teacher2')")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(!orphan);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_employee_duplicate_qualification(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    create_test_employee(&pool, Qualification::Teacher, 89000000001).await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/api/employee/add/",
        Some(&admin.token),
        Some(employee_payload("teacher2", 89000000002, "teacher")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["qualification"].is_array());
    assert_eq!(count_rows(&pool, "employees").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_employee_rejects_mismatched_role(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let app = setup_test_app(pool.clone());

    let mut payload = employee_payload("teacher1", 89001234567, "teacher");
    payload["user"]["role"] = json!("Parent");

    let (status, body) = send(
        &app,
        "POST",
        "/api/employee/add/",
        Some(&admin.token),
        Some(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["user.role"].is_array());
    assert_eq!(count_rows(&pool, "employees").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_employees_by_staff_only(pool: PgPool) {
    let employee = create_test_employee(&pool, Qualification::Teacher, 89000000001).await;
    let parent = create_test_user(&pool, Role::Parent).await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        &app,
        "GET",
        "/api/employee/list/",
        Some(&employee.user.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_no_password(&body);

    let (status, _) = send(&app, "GET", "/api/employee/list/", Some(&parent.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_employee_by_user_id(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let employee = create_test_employee(&pool, Qualification::Psychologist, 89000000001).await;
    let app = setup_test_app(pool.clone());

    let uri = format!("/api/employee/list/{}/", employee.user.id);
    let (status, body) = send(&app, "GET", &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], employee.id.to_string());

    let uri = format!("/api/employee/list/{}/", admin.id);
    let (status, _) = send(&app, "GET", &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_patch_employee_updates_only_given_fields(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let employee = create_test_employee(&pool, Qualification::Teacher, 89000000001).await;
    let app = setup_test_app(pool.clone());

    let uri = format!("/api/employee/edit/{}/", employee.id);
    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&admin.token),
        Some(json!({ "work_experience": 9 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["work_experience"], 9);
    assert_eq!(body["fname"], "Anna");
    assert_eq!(body["phone_number"], 89000000001_i64);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_put_employee_requires_full_body(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let employee = create_test_employee(&pool, Qualification::Teacher, 89000000001).await;
    let app = setup_test_app(pool.clone());

    let uri = format!("/api/employee/edit/{}/", employee.id);
    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin.token),
        Some(json!({ "fname": "Olga" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin.token),
        Some(json!({
            "fname": "Olga",
            "lname": "Sidorova",
            "patronymic": "Ivanovna",
            "gender": false,
            "birthday": "1985-01-01",
            "phone_number": 89000000009_i64,
            "qualification": "senior_teacher",
            "work_experience": 12
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fname"], "Olga");
    assert_eq!(body["qualification"], "senior_teacher");
    assert_eq!(body["patronymic"], "Ivanovna");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_edit_unknown_employee_returns_404(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let app = setup_test_app(pool.clone());

    let uri = format!("/api/employee/edit/{}/", uuid::Uuid::new_v4());
    let (status, _) = send(&app, "GET", &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PATCH",
        &uri,
        Some(&admin.token),
        Some(json!({ "fname": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_parent_success(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/api/parent/add/",
        Some(&admin.token),
        Some(parent_payload("p1", 89001234567)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["patronymic"], "Petrovich");
    assert_eq!(body["user"]["role"], "Parent");
    assert_no_password(&body);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_parent_duplicate_phone_rolls_back_identity(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    create_test_parent(&pool, 89001234567).await;
    let app = setup_test_app(pool.clone());
    let users_before = count_rows(&pool, "users").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/parent/add/",
        Some(&admin.token),
        Some(parent_payload("p2", 89001234567)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["phone_number"].is_array());
    assert_eq!(count_rows(&pool, "users").await, users_before);
    assert_eq!(count_rows(&pool, "parents").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_parent_duplicate_username(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let app = setup_test_app(pool.clone());

    let (status, _) = send(
        &app,
        "POST",
        "/api/parent/add/",
        Some(&admin.token),
        Some(parent_payload("p1", 89001234567)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/parent/add/",
        Some(&admin.token),
        Some(parent_payload("p1", 89001234568)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["username"].is_array());
    assert_eq!(count_rows(&pool, "parents").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_patch_parent_clears_patronymic(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let app = setup_test_app(pool.clone());

    let (_, created) = send(
        &app,
        "POST",
        "/api/parent/add/",
        Some(&admin.token),
        Some(parent_payload("p1", 89001234567)),
    )
    .await;
    let uri = format!("/api/parent/edit/{}/", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&admin.token),
        Some(json!({ "fname": "Pyotr" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fname"], "Pyotr");
    assert_eq!(body["patronymic"], "Petrovich");

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&admin.token),
        Some(json!({ "patronymic": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["patronymic"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_me_returns_own_profile(pool: PgPool) {
    let parent = create_test_parent(&pool, 89001234567).await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(&app, "GET", "/api/parent/me/", Some(&parent.user.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], parent.id.to_string());
    assert_eq!(body["user"]["username"], parent.user.username.as_str());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_me_without_profile_is_404(pool: PgPool) {
    let bare = create_test_user(&pool, Role::Parent).await;
    let app = setup_test_app(pool.clone());

    let (status, _) = send(&app, "GET", "/api/parent/me/", Some(&bare.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_parents_admin_only(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let employee = create_test_user(&pool, Role::Employee).await;
    create_test_parent(&pool, 89001234567).await;
    create_test_parent(&pool, 89001234568).await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(&app, "GET", "/api/parent/list/", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, "GET", "/api/parent/list/", Some(&employee.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_employee_missing_nested_field_reports_dotted_path(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let app = setup_test_app(pool.clone());

    let mut payload = employee_payload("teacher1", 89001234567, "teacher");
    payload["employee"]
        .as_object_mut()
        .unwrap()
        .remove("phone_number");

    let (status, body) = send(&app, "POST", "/api/employee/add/", Some(&admin.token), Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["employee.phone_number"].is_array());
    assert!(body["fields"]["phone_number"].is_null());
    assert_eq!(count_rows(&pool, "users").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_malformed_user_id_is_json_400(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(&app, "GET", "/api/parent/list/xyz/", Some(&admin.token), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
