mod common;

use axum::http::StatusCode;
use common::{read_body, TestApp};
use serde_json::json;

fn user_payload(username: &str, email: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": email,
        "password": "initial-pw-1",
        "role": "Cashier"
    })
}

#[tokio::test]
async fn test_user_crud_and_uniqueness() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "admin123").await;

    let response = app
        .request("POST", "/api/users", Some(&admin), Some(user_payload("clerk", "clerk@test.local")))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_body(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["role"], "Cashier");
    assert_eq!(created["isActive"], true);
    assert!(created.get("passwordHash").is_none());

    let same_username = app
        .request("POST", "/api/users", Some(&admin), Some(user_payload("clerk", "other@test.local")))
        .await;
    assert_eq!(same_username.status(), StatusCode::CONFLICT);

    let same_email = app
        .request("POST", "/api/users", Some(&admin), Some(user_payload("clerk2", "clerk@test.local")))
        .await;
    assert_eq!(same_email.status(), StatusCode::CONFLICT);

    let fetched = read_body(app.request("GET", &format!("/api/users/{id}"), Some(&admin), None).await).await;
    assert_eq!(fetched["username"], "clerk");

    let delete = app.request("DELETE", &format!("/api/users/{id}"), Some(&admin), None).await;
    assert_eq!(delete.status(), StatusCode::NO_CONTENT);

    let gone = app.request("GET", &format!("/api/users/{id}"), Some(&admin), None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rotates_password_only_when_supplied() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "admin123").await;

    let created = read_body(
        app.request("POST", "/api/users", Some(&admin), Some(user_payload("rotator", "rotator@test.local")))
            .await,
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    // No password in the body: the old one keeps working.
    let update = app
        .request(
            "PUT",
            &format!("/api/users/{id}"),
            Some(&admin),
            Some(json!({
                "id": id,
                "username": "rotator",
                "email": "rotator@test.local",
                "role": "Moderator",
                "isActive": true
            })),
        )
        .await;
    assert_eq!(update.status(), StatusCode::OK);
    assert_eq!(read_body(update).await["role"], "Moderator");
    app.login("rotator", "initial-pw-1").await;

    // A new password invalidates the old one.
    let rotate = app
        .request(
            "PUT",
            &format!("/api/users/{id}"),
            Some(&admin),
            Some(json!({
                "id": id,
                "username": "rotator",
                "email": "rotator@test.local",
                "password": "rotated-pw-2",
                "role": "Moderator",
                "isActive": true
            })),
        )
        .await;
    assert_eq!(rotate.status(), StatusCode::OK);

    let old = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "rotator", "password": "initial-pw-1" })),
        )
        .await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);
    app.login("rotator", "rotated-pw-2").await;
}

#[tokio::test]
async fn test_update_user_collisions_and_id_mismatch() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "admin123").await;

    let a = read_body(
        app.request("POST", "/api/users", Some(&admin), Some(user_payload("user-a", "a@test.local"))).await,
    )
    .await;
    let b = read_body(
        app.request("POST", "/api/users", Some(&admin), Some(user_payload("user-b", "b@test.local"))).await,
    )
    .await;
    let b_id = b["id"].as_str().unwrap();

    let mismatch = app
        .request(
            "PUT",
            &format!("/api/users/{b_id}"),
            Some(&admin),
            Some(json!({
                "id": a["id"], "username": "user-b", "email": "b@test.local",
                "role": "Cashier", "isActive": true
            })),
        )
        .await;
    assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);

    let username_taken = app
        .request(
            "PUT",
            &format!("/api/users/{b_id}"),
            Some(&admin),
            Some(json!({
                "id": b_id, "username": "user-a", "email": "b@test.local",
                "role": "Cashier", "isActive": true
            })),
        )
        .await;
    assert_eq!(username_taken.status(), StatusCode::CONFLICT);

    let email_taken = app
        .request(
            "PUT",
            &format!("/api/users/{b_id}"),
            Some(&admin),
            Some(json!({
                "id": b_id, "username": "user-b", "email": "a@test.local",
                "role": "Cashier", "isActive": true
            })),
        )
        .await;
    assert_eq!(email_taken.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_deleted_user_cannot_login() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "admin123").await;

    let created = read_body(
        app.request("POST", "/api/users", Some(&admin), Some(user_payload("leaver", "leaver@test.local")))
            .await,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    app.login("leaver", "initial-pw-1").await;
    app.request("DELETE", &format!("/api/users/{id}"), Some(&admin), None).await;

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "leaver", "password": "initial-pw-1" })),
        )
        .await;
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_management_is_super_admin_only() {
    let app = TestApp::new().await;
    let moderator = app.login("moderator", "moderator123").await;
    let cashier = app.login("cashier", "cashier123").await;

    for token in [&moderator, &cashier] {
        let list = app.request("GET", "/api/users", Some(token), None).await;
        assert_eq!(list.status(), StatusCode::FORBIDDEN);

        let create = app
            .request("POST", "/api/users", Some(token), Some(user_payload("sneak", "sneak@test.local")))
            .await;
        assert_eq!(create.status(), StatusCode::FORBIDDEN);
    }
}
