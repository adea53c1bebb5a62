//! Storage traits and shared query types
//!
//! Every collection lives behind an async trait so the service layer is
//! indifferent to the backend: Postgres in production, in-memory for tests
//! and database-less runs. The one non-CRUD primitive is
//! [`CatalogStore::adjust_stock`], an atomic conditional update that the
//! order workflow relies on for oversell prevention.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Category, Inquiry, InquiryResponse, InquiryStatus, InquiryType, Order, OrderStatus, Product,
    Session, User,
};
use crate::Result;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone, Copy, Debug)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(20).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[derive(Clone, Debug, Default)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    /// Staff listings may include hidden products.
    pub include_inactive: bool,
}

#[derive(Clone, Debug, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<Uuid>,
}

#[derive(Clone, Debug, Default)]
pub struct InquiryFilter {
    pub status: Option<InquiryStatus>,
    pub inquiry_type: Option<InquiryType>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: InquiryStatus,
    pub count: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryStats {
    pub total_contacts: i64,
    pub new_contacts: i64,
    pub replied_contacts: i64,
    pub status_breakdown: Vec<StatusCount>,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_product(&self, product: Product) -> Result<Product>;
    async fn product(&self, id: Uuid) -> Result<Option<Product>>;
    async fn list_products(&self, filter: &ProductFilter, page: PageRequest)
        -> Result<Page<Product>>;
    async fn update_product(&self, product: Product) -> Result<Product>;
    /// Soft delete: hides the product from non-staff callers.
    async fn deactivate_product(&self, id: Uuid) -> Result<()>;
    /// Applies a signed stock delta as one indivisible operation. Fails with
    /// [`crate::Error::InsufficientStock`] when the result would go below
    /// zero, applying nothing. Syncs the `in_stock` flag: a delta landing on
    /// zero clears it, a positive delta sets it.
    async fn adjust_stock(&self, id: Uuid, delta: i64) -> Result<Product>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_order(&self, order: Order) -> Result<Order>;
    async fn order(&self, id: Uuid) -> Result<Option<Order>>;
    /// Newest first.
    async fn list_orders(&self, filter: &OrderFilter, page: PageRequest) -> Result<Page<Order>>;
    async fn set_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order>;
}

#[async_trait]
pub trait InquiryStore: Send + Sync {
    async fn insert_inquiry(&self, inquiry: Inquiry) -> Result<Inquiry>;
    async fn inquiry(&self, id: Uuid) -> Result<Option<Inquiry>>;
    async fn list_inquiries(
        &self,
        filter: &InquiryFilter,
        page: PageRequest,
    ) -> Result<Page<Inquiry>>;
    async fn set_inquiry_status(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry>;
    async fn assign_inquiry(&self, id: Uuid, assignee: Option<Uuid>) -> Result<Inquiry>;
    /// Attaches a staff response and moves the inquiry to `replied`.
    async fn set_inquiry_response(&self, id: Uuid, response: InquiryResponse) -> Result<Inquiry>;
    async fn inquiry_stats(&self) -> Result<InquiryStats>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: User) -> Result<User>;
    async fn user(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn insert_session(&self, session: Session) -> Result<()>;
    async fn session(&self, token: &str) -> Result<Option<Session>>;
}

/// Everything the services need from a backend.
pub trait Store: CatalogStore + OrderStore + InquiryStore + UserStore {}

impl<T: CatalogStore + OrderStore + InquiryStore + UserStore> Store for T {}
