//! In-memory store
//!
//! Backs tests and database-less runs. Collections are `RwLock`ed maps; the
//! whole read-check-write of `adjust_stock` happens under the write lock,
//! which is what makes the stock reservation atomic in this backend.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    Inquiry, InquiryResponse, InquiryStatus, Order, OrderStatus, Product, Session, User,
};
use crate::store::{
    CatalogStore, InquiryFilter, InquiryStats, InquiryStore, OrderFilter, OrderStore, Page,
    PageRequest, ProductFilter, StatusCount, UserStore,
};
use crate::{Error, Result};

#[derive(Clone, Default)]
pub struct MemoryStore {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
    inquiries: Arc<RwLock<HashMap<Uuid, Inquiry>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T: Clone>(mut items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let start = (page.offset() as usize).min(items.len());
    let end = (start + page.limit as usize).min(items.len());
    items.drain(..start);
    items.truncate(end - start);
    Page { items, total }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_product(&self, product: Product) -> Result<Product> {
        let mut products = self.products.write().expect("RwLock poisoned");
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn product(&self, id: Uuid) -> Result<Option<Product>> {
        let products = self.products.read().expect("RwLock poisoned");
        Ok(products.get(&id).cloned())
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>> {
        let products = self.products.read().expect("RwLock poisoned");
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let mut matched: Vec<Product> = products
            .values()
            .filter(|p| filter.include_inactive || p.is_active)
            .filter(|p| filter.category.map_or(true, |c| p.category == c))
            .filter(|p| filter.featured.map_or(true, |f| p.featured == f))
            .filter(|p| {
                needle.as_deref().map_or(true, |n| {
                    p.name.to_lowercase().contains(n)
                        || p.description.to_lowercase().contains(n)
                        || p.tags.iter().any(|t| t.to_lowercase().contains(n))
                })
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(matched, page))
    }

    async fn update_product(&self, product: Product) -> Result<Product> {
        let mut products = self.products.write().expect("RwLock poisoned");
        if !products.contains_key(&product.id) {
            return Err(Error::NotFound("product"));
        }
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn deactivate_product(&self, id: Uuid) -> Result<()> {
        let mut products = self.products.write().expect("RwLock poisoned");
        let product = products.get_mut(&id).ok_or(Error::NotFound("product"))?;
        product.is_active = false;
        product.updated_at = Utc::now();
        Ok(())
    }

    async fn adjust_stock(&self, id: Uuid, delta: i64) -> Result<Product> {
        let mut products = self.products.write().expect("RwLock poisoned");
        let product = products.get_mut(&id).ok_or(Error::NotFound("product"))?;
        let next = product.stock_quantity + delta;
        if next < 0 {
            return Err(Error::InsufficientStock(id));
        }
        product.stock_quantity = next;
        if next == 0 {
            product.in_stock = false;
        } else if delta > 0 {
            product.in_stock = true;
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: Order) -> Result<Order> {
        let mut orders = self.orders.write().expect("RwLock poisoned");
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn order(&self, id: Uuid) -> Result<Option<Order>> {
        let orders = self.orders.read().expect("RwLock poisoned");
        Ok(orders.get(&id).cloned())
    }

    async fn list_orders(&self, filter: &OrderFilter, page: PageRequest) -> Result<Page<Order>> {
        let orders = self.orders.read().expect("RwLock poisoned");
        let mut matched: Vec<Order> = orders
            .values()
            .filter(|o| filter.status.map_or(true, |s| o.status == s))
            .filter(|o| filter.customer_id.map_or(true, |c| o.customer_id == c))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(matched, page))
    }

    async fn set_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order> {
        let mut orders = self.orders.write().expect("RwLock poisoned");
        let order = orders.get_mut(&id).ok_or(Error::NotFound("order"))?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }
}

#[async_trait]
impl InquiryStore for MemoryStore {
    async fn insert_inquiry(&self, inquiry: Inquiry) -> Result<Inquiry> {
        let mut inquiries = self.inquiries.write().expect("RwLock poisoned");
        inquiries.insert(inquiry.id, inquiry.clone());
        Ok(inquiry)
    }

    async fn inquiry(&self, id: Uuid) -> Result<Option<Inquiry>> {
        let inquiries = self.inquiries.read().expect("RwLock poisoned");
        Ok(inquiries.get(&id).cloned())
    }

    async fn list_inquiries(
        &self,
        filter: &InquiryFilter,
        page: PageRequest,
    ) -> Result<Page<Inquiry>> {
        let inquiries = self.inquiries.read().expect("RwLock poisoned");
        let mut matched: Vec<Inquiry> = inquiries
            .values()
            .filter(|i| filter.status.map_or(true, |s| i.status == s))
            .filter(|i| filter.inquiry_type.map_or(true, |t| i.inquiry_type == t))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(matched, page))
    }

    async fn set_inquiry_status(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry> {
        let mut inquiries = self.inquiries.write().expect("RwLock poisoned");
        let inquiry = inquiries.get_mut(&id).ok_or(Error::NotFound("contact inquiry"))?;
        inquiry.status = status;
        inquiry.updated_at = Utc::now();
        Ok(inquiry.clone())
    }

    async fn assign_inquiry(&self, id: Uuid, assignee: Option<Uuid>) -> Result<Inquiry> {
        let mut inquiries = self.inquiries.write().expect("RwLock poisoned");
        let inquiry = inquiries.get_mut(&id).ok_or(Error::NotFound("contact inquiry"))?;
        inquiry.assigned_to = assignee;
        inquiry.updated_at = Utc::now();
        Ok(inquiry.clone())
    }

    async fn set_inquiry_response(&self, id: Uuid, response: InquiryResponse) -> Result<Inquiry> {
        let mut inquiries = self.inquiries.write().expect("RwLock poisoned");
        let inquiry = inquiries.get_mut(&id).ok_or(Error::NotFound("contact inquiry"))?;
        inquiry.response = Some(response);
        inquiry.status = InquiryStatus::Replied;
        inquiry.updated_at = Utc::now();
        Ok(inquiry.clone())
    }

    async fn inquiry_stats(&self) -> Result<InquiryStats> {
        let inquiries = self.inquiries.read().expect("RwLock poisoned");
        let mut breakdown: Vec<StatusCount> = Vec::new();
        for status in [
            InquiryStatus::New,
            InquiryStatus::Read,
            InquiryStatus::Replied,
            InquiryStatus::Closed,
        ] {
            let count = inquiries.values().filter(|i| i.status == status).count() as i64;
            if count > 0 {
                breakdown.push(StatusCount { status, count });
            }
        }
        let count_of = |s: InquiryStatus| {
            breakdown
                .iter()
                .find(|c| c.status == s)
                .map_or(0, |c| c.count)
        };
        Ok(InquiryStats {
            total_contacts: inquiries.len() as i64,
            new_contacts: count_of(InquiryStatus::New),
            replied_contacts: count_of(InquiryStatus::Replied),
            status_breakdown: breakdown,
        })
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        let mut users = self.users.write().expect("RwLock poisoned");
        if users.values().any(|u| u.username == user.username) {
            return Err(Error::validation("username already taken"));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().expect("RwLock poisoned");
        Ok(users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().expect("RwLock poisoned");
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn insert_session(&self, session: Session) -> Result<()> {
        let mut sessions = self.sessions.write().expect("RwLock poisoned");
        sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn session(&self, token: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.read().expect("RwLock poisoned");
        Ok(sessions.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, ProductDraft, Quality};
    use rust_decimal::Decimal;

    fn product(stock: i64) -> Product {
        Product::create(ProductDraft {
            name: "Cottonyarn - Natural".into(),
            description: "Soft cotton yarn".into(),
            price: Decimal::new(1200, 0),
            original_price: None,
            images: vec![],
            category: Category::Cottonyarn,
            color: "Natural".into(),
            weight: "30/2".into(),
            origin: "India".into(),
            quality: Quality::A,
            in_stock: stock > 0,
            stock_quantity: stock,
            rating: 4.5,
            reviews: 10,
            tags: vec!["cotton".into()],
            featured: false,
            is_active: true,
        })
    }

    #[tokio::test]
    async fn test_adjust_stock_underflow_applies_nothing() {
        let store = MemoryStore::new();
        let p = store.insert_product(product(3)).await.unwrap();
        let err = store.adjust_stock(p.id, -5).await.unwrap_err();
        assert!(matches!(err, Error::InsufficientStock(_)));
        let unchanged = store.product(p.id).await.unwrap().unwrap();
        assert_eq!(unchanged.stock_quantity, 3);
    }

    #[tokio::test]
    async fn test_adjust_stock_syncs_in_stock_flag() {
        let store = MemoryStore::new();
        let p = store.insert_product(product(2)).await.unwrap();
        let drained = store.adjust_stock(p.id, -2).await.unwrap();
        assert_eq!(drained.stock_quantity, 0);
        assert!(!drained.in_stock);
        let restocked = store.adjust_stock(p.id, 4).await.unwrap();
        assert!(restocked.in_stock);
    }

    #[tokio::test]
    async fn test_list_products_hides_inactive() {
        let store = MemoryStore::new();
        let mut hidden = product(5);
        hidden.is_active = false;
        store.insert_product(hidden).await.unwrap();
        store.insert_product(product(5)).await.unwrap();

        let public = store
            .list_products(&ProductFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(public.total, 1);

        let staff = store
            .list_products(
                &ProductFilter { include_inactive: true, ..Default::default() },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(staff.total, 2);
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let store = MemoryStore::new();
        for _ in 0..5 {
            store.insert_product(product(1)).await.unwrap();
        }
        let page = store
            .list_products(
                &ProductFilter::default(),
                PageRequest::new(Some(2), Some(2)),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
    }
}
