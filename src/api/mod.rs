//! HTTP surface

pub mod auth;
pub mod contacts;
pub mod extract;
pub mod orders;
pub mod products;

use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::publish::EventPublisher;
use crate::service::{AuthService, CatalogService, InquiryService, OrderService, SharedStore};
use crate::store::{Page, PageRequest};

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub orders: OrderService,
    pub inquiries: InquiryService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(store: SharedStore, events: EventPublisher) -> Self {
        Self {
            catalog: CatalogService::new(store.clone(), events.clone()),
            orders: OrderService::new(store.clone(), events.clone()),
            inquiries: InquiryService::new(store.clone(), events),
            auth: AuthService::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({"status": "healthy", "service": "threadfront"})) }),
        )
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::get).put(products::update).delete(products::remove),
        )
        .route("/products/:id/stock", patch(products::adjust_stock))
        .route("/orders", get(orders::list_all).post(orders::create))
        .route("/orders/my-orders", get(orders::list_mine))
        .route("/orders/:id", get(orders::get))
        .route("/orders/:id/status", patch(orders::update_status))
        .route("/orders/:id/cancel", patch(orders::cancel))
        .route("/contacts", get(contacts::list).post(contacts::submit))
        .route("/contacts/:id", get(contacts::get))
        .route("/contacts/:id/status", patch(contacts::update_status))
        .route("/contacts/:id/respond", post(contacts::respond))
        .route("/contacts/:id/assign", patch(contacts::assign))
        .route("/contacts/stats/overview", get(contacts::stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: i64,
    pub total_count: i64,
}

/// List envelope: `{ items, pagination }`.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(page: Page<T>, request: PageRequest) -> Self {
        let total_pages = (page.total + i64::from(request.limit) - 1) / i64::from(request.limit);
        Self {
            items: page.items,
            pagination: Pagination {
                current_page: request.page,
                total_pages,
                total_count: page.total,
            },
        }
    }
}
