//! Catalog management and inventory adjustment

use uuid::Uuid;

use crate::domain::events::DomainEvent;
use crate::domain::{Product, ProductDraft};
use crate::publish::EventPublisher;
use crate::service::SharedStore;
use crate::store::{Page, PageRequest, ProductFilter};
use crate::{Error, Result};

#[derive(Clone)]
pub struct CatalogService {
    store: SharedStore,
    events: EventPublisher,
}

impl CatalogService {
    pub fn new(store: SharedStore, events: EventPublisher) -> Self {
        Self { store, events }
    }

    fn check_draft(draft: &ProductDraft) -> Result<()> {
        if draft.name.trim().is_empty() {
            return Err(Error::validation("product name is required"));
        }
        if draft.price.is_sign_negative() {
            return Err(Error::validation("price must be non-negative"));
        }
        if draft
            .original_price
            .is_some_and(|p| p.is_sign_negative())
        {
            return Err(Error::validation("original price must be non-negative"));
        }
        if draft.stock_quantity < 0 {
            return Err(Error::validation("stock quantity must be non-negative"));
        }
        if !(0.0..=5.0).contains(&draft.rating) {
            return Err(Error::validation("rating must be between 0 and 5"));
        }
        Ok(())
    }

    pub async fn create(&self, draft: ProductDraft) -> Result<Product> {
        Self::check_draft(&draft)?;
        self.store.insert_product(Product::create(draft)).await
    }

    pub async fn update(&self, id: Uuid, draft: ProductDraft) -> Result<Product> {
        Self::check_draft(&draft)?;
        let mut product = self.store.product(id).await?.ok_or(Error::NotFound("product"))?;
        product.apply(draft);
        self.store.update_product(product).await
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<()> {
        self.store.deactivate_product(id).await
    }

    /// Staff restock / correction. Signed delta; underflow fails without
    /// applying anything.
    pub async fn adjust_stock(&self, id: Uuid, delta: i64) -> Result<Product> {
        if delta == 0 {
            return Err(Error::validation("delta must be non-zero"));
        }
        let product = self.store.adjust_stock(id, delta).await?;
        self.events
            .publish(DomainEvent::StockAdjusted {
                product_id: id,
                delta,
                remaining: product.stock_quantity,
            })
            .await;
        Ok(product)
    }

    /// Non-staff callers never see inactive products.
    pub async fn get(&self, id: Uuid, include_inactive: bool) -> Result<Product> {
        let product = self.store.product(id).await?.ok_or(Error::NotFound("product"))?;
        if !product.is_active && !include_inactive {
            return Err(Error::NotFound("product"));
        }
        Ok(product)
    }

    pub async fn list(&self, filter: &ProductFilter, page: PageRequest) -> Result<Page<Product>> {
        self.store.list_products(filter, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Quality};
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(MemoryStore::new()), EventPublisher::disabled())
    }

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Dyed Yarn - Crimson".into(),
            description: "Vat-dyed yarn".into(),
            price: Decimal::new(2100, 0),
            original_price: None,
            images: vec![],
            category: Category::Dyed,
            color: "Crimson".into(),
            weight: "13/15".into(),
            origin: "West Bengal".into(),
            quality: Quality::A,
            in_stock: true,
            stock_quantity: 10,
            rating: 4.2,
            reviews: 7,
            tags: vec![],
            featured: false,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let catalog = service();
        let bad = ProductDraft { price: Decimal::new(-1, 0), ..draft() };
        assert!(matches!(
            catalog.create(bad).await.unwrap_err(),
            Error::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_inactive_hidden_from_public_get() {
        let catalog = service();
        let mut d = draft();
        d.is_active = false;
        let p = catalog.create(d).await.unwrap();
        assert!(matches!(
            catalog.get(p.id, false).await.unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(catalog.get(p.id, true).await.is_ok());
    }

    #[tokio::test]
    async fn test_adjust_stock_zero_delta_rejected() {
        let catalog = service();
        let p = catalog.create(draft()).await.unwrap();
        assert!(matches!(
            catalog.adjust_stock(p.id, 0).await.unwrap_err(),
            Error::Validation(_)
        ));
    }
}
