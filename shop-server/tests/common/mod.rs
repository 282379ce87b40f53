//! Shared harness: a fresh embedded database per test and oneshot requests
//! against the fully layered router.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, Bytes};
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use shop_server::api::build_app;
use shop_server::auth::JwtConfig;
use shop_server::db::DbService;
use shared::order::OrderStatus;
use shop_server::db::models::{Order, OrderCreate, OrderItem, OrderPatch, ShippingAddress};
use shop_server::db::repository::OrderRepository;
use shop_server::{Config, ServerState};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_ID: &str = "customer:admin";
pub const CUSTOMER_ID: &str = "customer:an";

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }
}

pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let jwt = JwtConfig {
        secret: "integration-test-secret-with-32-chars!!".to_string(),
        expiration_minutes: 60,
        issuer: "luxevie-auth".to_string(),
        audience: "luxevie-clients".to_string(),
    };
    let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), jwt);
    let db = DbService::new(config.database_dir()).await.unwrap();
    let state = ServerState::new(config, db.db);
    TestApp {
        app: build_app(state.clone()),
        state,
        _dir: dir,
    }
}

impl TestApp {
    pub fn admin_token(&self) -> String {
        self.state
            .jwt_service
            .generate_token(ADMIN_ID, "admin@luxevie.vn", "admin")
            .unwrap()
    }

    pub fn customer_token(&self) -> String {
        self.state
            .jwt_service
            .generate_token(CUSTOMER_ID, "an@example.com", "user")
            .unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    /// Insert an order directly through the repository
    pub async fn seed_order(&self, created_at: i64, items: Vec<OrderItem>) -> Order {
        self.seed_order_with(OrderCreate {
            items,
            created_at: Some(created_at),
            ..checkout()
        })
        .await
    }

    pub async fn seed_order_with(&self, create: OrderCreate) -> Order {
        let now = create.created_at.unwrap_or_default();
        OrderRepository::new(self.state.db.clone())
            .create(create, now)
            .await
            .unwrap()
    }

    /// Overwrite an order's status without going through the state machine
    pub async fn force_status(&self, order: &Order, status: OrderStatus) -> Order {
        let patch = OrderPatch {
            status: Some(status),
            updated_at: order.created_at,
            updated_by: ADMIN_ID.to_string(),
            ..Default::default()
        };
        OrderRepository::new(self.state.db.clone())
            .apply_patch(order.id.as_ref().unwrap(), patch)
            .await
            .unwrap()
            .unwrap()
    }
}

/// Checkout input shared by seeded orders: customer An, 30 000 VND shipping
pub fn checkout() -> OrderCreate {
    OrderCreate {
        user_id: Some(CUSTOMER_ID.parse().unwrap()),
        shipping_fee: 30_000,
        shipping_address: ShippingAddress {
            full_name: "Nguyễn Văn An".into(),
            phone: "0901234567".into(),
            line1: "12 Lý Thường Kiệt".into(),
            city: "Hà Nội".into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn item(sku: &str, name: &str, unit_price: i64, quantity: i64) -> OrderItem {
    OrderItem {
        product_id: None,
        sku: Some(sku.to_string()),
        name: Some(name.to_string()),
        unit_price,
        quantity,
        size: None,
        color: None,
    }
}
