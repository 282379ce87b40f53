//! Admin order console over HTTP: status / paid updates and cancellation

mod common;

use common::{item, spawn_app};
use http::{Method, StatusCode};
use serde_json::json;

const CREATED_AT: i64 = 1_709_280_000_000;

#[tokio::test]
async fn test_status_update_stamps_milestone_once() {
    let app = spawn_app().await;
    let token = app.admin_token();
    let order = app
        .seed_order(CREATED_AT, vec![item("AT-01", "Áo thun", 150_000, 2)])
        .await;
    let uri = format!("/api/admin/orders/{}", order.id_string());

    let res = app
        .request(Method::PATCH, &uri, Some(&token), Some(json!({"status": "confirmed"})))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["order"]["status"], "confirmed");
    assert_eq!(body["order"]["paid"], false);
    assert_eq!(body["order"]["updated_by"], common::ADMIN_ID);
    let confirmed_at = body["order"]["confirmed_at"].as_i64().unwrap();

    // Back to pending and forward again keeps the first stamp
    for status in ["pending", "confirmed"] {
        let res = app
            .request(Method::PATCH, &uri, Some(&token), Some(json!({"status": status})))
            .await;
        assert_eq!(res.status, StatusCode::OK);
    }
    let body = app.get(&uri, Some(&token)).await.json();
    assert_eq!(body["order"]["status"], "confirmed");
    assert_eq!(body["order"]["confirmed_at"].as_i64(), Some(confirmed_at));
    assert!(body["order"]["shipped_at"].is_null());
}

#[tokio::test]
async fn test_paid_flag_is_independent_of_status() {
    let app = spawn_app().await;
    let token = app.admin_token();
    let order = app
        .seed_order(CREATED_AT, vec![item("AT-01", "Áo thun", 150_000, 1)])
        .await;
    let uri = format!("/api/admin/orders/{}", order.id_string());

    let res = app
        .request(Method::PATCH, &uri, Some(&token), Some(json!({"paid": true})))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["order"]["paid"], true);
    assert_eq!(body["order"]["status"], "pending");
    assert_eq!(body["order"]["total"], 180_000);
}

#[tokio::test]
async fn test_invalid_update_bodies_rejected() {
    let app = spawn_app().await;
    let token = app.admin_token();
    let order = app
        .seed_order(CREATED_AT, vec![item("AT-01", "Áo thun", 150_000, 1)])
        .await;
    let uri = format!("/api/admin/orders/{}", order.id_string());

    let res = app
        .request(Method::PATCH, &uri, Some(&token), Some(json!({})))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["code"], 4004);

    let res = app
        .request(Method::PATCH, &uri, Some(&token), Some(json!({"status": "lost"})))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["code"], 4002);

    // Nothing was written
    let body = app.get(&uri, Some(&token)).await.json();
    assert_eq!(body["order"]["status"], "pending");
    assert!(body["order"]["updated_at"].is_null());
}

#[tokio::test]
async fn test_cancel_only_from_open_statuses() {
    let app = spawn_app().await;
    let token = app.admin_token();
    let order = app
        .seed_order(CREATED_AT, vec![item("AT-01", "Áo thun", 150_000, 1)])
        .await;
    let uri = format!("/api/admin/orders/{}", order.id_string());
    let cancel_uri = format!("{uri}/cancel");

    let res = app
        .request(Method::PATCH, &uri, Some(&token), Some(json!({"status": "shipped"})))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.request(Method::POST, &cancel_uri, Some(&token), None).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["order"]["status"], "cancelled");
    assert!(body["order"]["shipped_at"].is_i64());

    let res = app.request(Method::POST, &cancel_uri, Some(&token), None).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.json()["code"], 4003);
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let app = spawn_app().await;
    let token = app.admin_token();

    let res = app.get("/api/admin/orders/order:missing", Some(&token)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .request(
            Method::PATCH,
            "/api/admin/orders/missing",
            Some(&token),
            Some(json!({"paid": true})),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    // Ids naming another table never resolve
    let res = app.get("/api/admin/orders/product:abc", Some(&token)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_routes_require_admin() {
    let app = spawn_app().await;
    let order = app
        .seed_order(CREATED_AT, vec![item("AT-01", "Áo thun", 150_000, 1)])
        .await;
    let uri = format!("/api/admin/orders/{}", order.id_string());

    let res = app.get(&uri, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.get(&uri, Some("not-a-token")).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let customer = app.customer_token();
    let res = app
        .request(Method::PATCH, &uri, Some(&customer), Some(json!({"paid": true})))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_filters_and_pages() {
    let app = spawn_app().await;
    let token = app.admin_token();
    for i in 0..3 {
        app.seed_order(CREATED_AT + i, vec![item("AT-01", "Áo thun", 100_000, 1)])
            .await;
    }
    let newest = app
        .seed_order(CREATED_AT + 10, vec![item("QJ-02", "Quần jean", 400_000, 1)])
        .await;
    let res = app
        .request(
            Method::POST,
            &format!("/api/admin/orders/{}/cancel", newest.id_string()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let body = app.get("/api/admin/orders?per_page=2", Some(&token)).await.json();
    assert_eq!(body["total"], 4);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["id"], newest.id_string());

    let body = app
        .get("/api/admin/orders?status=cancelled", Some(&token))
        .await
        .json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["status"], "cancelled");

    let res = app.get("/api/admin/orders?status=lost", Some(&token)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}
