//! Shared setup for API tests: an app wired to the in-memory store, with a
//! bootstrapped staff account and a registered customer.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use threadfront::api::{self, AppState};
use threadfront::domain::{Category, Product, ProductDraft, Quality};
use threadfront::publish::EventPublisher;
use threadfront::store::{CatalogStore, MemoryStore};
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub staff_token: String,
    pub customer_token: String,
    pub customer_id: Uuid,
}

pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), EventPublisher::disabled());

    state
        .auth
        .bootstrap_admin("owner", "owner@example.com", "ownerpw")
        .await
        .unwrap();
    let (_, staff_session) = state.auth.login("owner", "ownerpw").await.unwrap();

    let customer = state
        .auth
        .register("ravi".into(), "ravi@example.com".into(), "customerpw".into())
        .await
        .unwrap();
    let (_, customer_session) = state.auth.login("ravi", "customerpw").await.unwrap();

    TestApp {
        router: api::router(state),
        store,
        staff_token: staff_session.token,
        customer_token: customer_session.token,
        customer_id: customer.id,
    }
}

impl TestApp {
    pub async fn seed_product(&self, name: &str, price: i64, stock: i64) -> Product {
        self.store
            .insert_product(Product::create(ProductDraft {
                name: name.into(),
                description: "seeded".into(),
                price: Decimal::new(price, 0),
                original_price: None,
                images: vec![],
                category: Category::Silkyarn,
                color: "White".into(),
                weight: "20/22".into(),
                origin: "Karnataka".into(),
                quality: Quality::APlus,
                in_stock: stock > 0,
                stock_quantity: stock,
                rating: 4.5,
                reviews: 3,
                tags: vec![],
                featured: false,
                is_active: true,
            }))
            .await
            .unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    json_body(response).await
}
