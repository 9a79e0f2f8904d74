mod common;

use axum::http::StatusCode;
use common::{read_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_category_lifecycle() {
    let app = TestApp::new().await;
    let token = app.login("moderator", "moderator123").await;

    let response = app
        .request(
            "POST",
            "/api/categories",
            Some(&token),
            Some(json!({ "name": "Beverages", "description": "Drinks of all kinds" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_body(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["productCount"], 0);

    let updated = app
        .request(
            "PUT",
            &format!("/api/categories/{id}"),
            Some(&token),
            Some(json!({ "name": "Cold Beverages", "description": "Chilled drinks" })),
        )
        .await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(read_body(updated).await["name"], "Cold Beverages");

    let delete = app.request("DELETE", &format!("/api/categories/{id}"), Some(&token), None).await;
    assert_eq!(delete.status(), StatusCode::NO_CONTENT);

    let gone = app.request("GET", &format!("/api/categories/{id}"), Some(&token), None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_category_name_is_conflict() {
    let app = TestApp::new().await;
    let token = app.login("moderator", "moderator123").await;

    app.request("POST", "/api/categories", Some(&token), Some(json!({ "name": "Tools" })))
        .await;

    let duplicate = app
        .request("POST", "/api/categories", Some(&token), Some(json!({ "name": "Tools" })))
        .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    // Renaming another category onto the taken name collides too.
    let other = read_body(
        app.request("POST", "/api/categories", Some(&token), Some(json!({ "name": "Hardware" }))).await,
    )
    .await;
    let other_id = other["id"].as_str().unwrap();
    let rename = app
        .request(
            "PUT",
            &format!("/api/categories/{other_id}"),
            Some(&token),
            Some(json!({ "name": "Tools" })),
        )
        .await;
    assert_eq!(rename.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_unknown_category_is_not_found() {
    let app = TestApp::new().await;
    let token = app.login("moderator", "moderator123").await;

    let response = app
        .request("PUT", "/api/categories/missing", Some(&token), Some(json!({ "name": "X" })))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_category_blocked_while_products_reference_it() {
    let app = TestApp::new().await;
    let token = app.login("moderator", "moderator123").await;

    let category = read_body(
        app.request("POST", "/api/categories", Some(&token), Some(json!({ "name": "Bound" }))).await,
    )
    .await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let product = read_body(
        app.request(
            "POST",
            "/api/products",
            Some(&token),
            Some(json!({
                "name": "Member", "sku": "MEM-1", "price": 1.0, "cost": 1.0,
                "categoryId": category_id
            })),
        )
        .await,
    )
    .await;
    let product_id = product["id"].as_str().unwrap().to_string();
    assert_eq!(product["categoryName"], "Bound");

    let blocked = app
        .request("DELETE", &format!("/api/categories/{category_id}"), Some(&token), None)
        .await;
    assert_eq!(blocked.status(), StatusCode::CONFLICT);
    let body = read_body(blocked).await;
    assert_eq!(body["error"], "Cannot delete category 'Bound' because it has associated products");

    // The count shows up on reads while the product exists.
    let fetched = read_body(
        app.request("GET", &format!("/api/categories/{category_id}"), Some(&token), None).await,
    )
    .await;
    assert_eq!(fetched["productCount"], 1);

    // Removing the product unblocks the delete.
    app.request("DELETE", &format!("/api/products/{product_id}"), Some(&token), None).await;
    let delete = app
        .request("DELETE", &format!("/api/categories/{category_id}"), Some(&token), None)
        .await;
    assert_eq!(delete.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_products_by_category_listing() {
    let app = TestApp::new().await;
    let token = app.login("moderator", "moderator123").await;

    let category = read_body(
        app.request("POST", "/api/categories", Some(&token), Some(json!({ "name": "Filtered" }))).await,
    )
    .await;
    let category_id = category["id"].as_str().unwrap().to_string();

    app.request(
        "POST",
        "/api/products",
        Some(&token),
        Some(json!({
            "name": "In", "sku": "IN-1", "price": 1.0, "cost": 1.0, "categoryId": category_id
        })),
    )
    .await;
    app.request(
        "POST",
        "/api/products",
        Some(&token),
        Some(json!({ "name": "Out", "sku": "OUT-1", "price": 1.0, "cost": 1.0 })),
    )
    .await;

    let body = read_body(
        app.request("GET", &format!("/api/products/category/{category_id}"), Some(&token), None).await,
    )
    .await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["sku"], "IN-1");
}

#[tokio::test]
async fn test_category_writes_require_moderator() {
    let app = TestApp::new().await;
    let cashier = app.login("cashier", "cashier123").await;

    let create = app
        .request("POST", "/api/categories", Some(&cashier), Some(json!({ "name": "Denied" })))
        .await;
    assert_eq!(create.status(), StatusCode::FORBIDDEN);

    let list = app.request("GET", "/api/categories", Some(&cashier), None).await;
    assert_eq!(list.status(), StatusCode::OK);
}
