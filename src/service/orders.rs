//! Order workflow: placement, cancellation, status changes
//!
//! Placement reserves stock through the store's atomic conditional decrement,
//! one product at a time, and reverses every applied decrement if any line
//! fails. The order record is only persisted once the whole reservation
//! holds, so no partial stock mutation ever survives a failed create.

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::events::DomainEvent;
use crate::domain::{LineItem, Order, OrderStatus, ShippingAddress};
use crate::publish::EventPublisher;
use crate::service::{Caller, SharedStore};
use crate::store::{OrderFilter, Page, PageRequest};
use crate::{Error, Result};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub product_id: Uuid,
    pub quantity: i64,
}

#[derive(Clone)]
pub struct OrderService {
    store: SharedStore,
    events: EventPublisher,
}

impl OrderService {
    pub fn new(store: SharedStore, events: EventPublisher) -> Self {
        Self { store, events }
    }

    pub async fn create(
        &self,
        customer_id: Uuid,
        items: Vec<ItemRequest>,
        shipping_address: ShippingAddress,
        payment_method: String,
        notes: Option<String>,
    ) -> Result<Order> {
        if items.is_empty() {
            return Err(Error::validation("order must contain at least one item"));
        }
        if items.iter().any(|i| i.quantity < 1) {
            return Err(Error::validation("item quantity must be at least 1"));
        }

        // Validate references and snapshot prices. The stock comparison here
        // is advisory; the decrement below is the authoritative check.
        let mut lines = Vec::with_capacity(items.len());
        for item in &items {
            let product = self
                .store
                .product(item.product_id)
                .await?
                .filter(|p| p.is_active)
                .ok_or(Error::InvalidProduct(item.product_id))?;
            if !product.in_stock || product.stock_quantity < item.quantity {
                return Err(Error::InsufficientStock(product.id));
            }
            lines.push(LineItem {
                product_id: product.id,
                name: product.name,
                quantity: item.quantity,
                price: product.price,
            });
        }

        self.reserve(&lines).await?;

        let order = Order::place(
            customer_id,
            lines.clone(),
            shipping_address,
            payment_method,
            notes,
        );
        match self.store.insert_order(order).await {
            Ok(order) => {
                self.events
                    .publish(DomainEvent::OrderPlaced {
                        order_id: order.id,
                        customer_id,
                        total: order.total_amount,
                    })
                    .await;
                Ok(order)
            }
            Err(e) => {
                // Reservation held but the record never made it to storage;
                // give the stock back before reporting the failure.
                self.release(&lines).await;
                Err(e)
            }
        }
    }

    /// Decrements stock for every line, all-or-nothing. On a mid-way failure
    /// the already-applied decrements are reversed before the error is
    /// reported.
    async fn reserve(&self, lines: &[LineItem]) -> Result<()> {
        for (index, line) in lines.iter().enumerate() {
            if let Err(e) = self.store.adjust_stock(line.product_id, -line.quantity).await {
                self.release(&lines[..index]).await;
                return Err(match e {
                    Error::NotFound(_) => Error::InvalidProduct(line.product_id),
                    other => other,
                });
            }
        }
        Ok(())
    }

    async fn release(&self, lines: &[LineItem]) {
        for line in lines {
            if let Err(e) = self.store.adjust_stock(line.product_id, line.quantity).await {
                tracing::error!(
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    error = %e,
                    "failed to restore reserved stock"
                );
            }
        }
    }

    pub async fn cancel(&self, order_id: Uuid, caller: Caller) -> Result<Order> {
        let order = self.store.order(order_id).await?.ok_or(Error::NotFound("order"))?;
        if !caller.is_staff() && order.customer_id != caller.user_id {
            return Err(Error::Forbidden);
        }
        if !order.status.cancellable() {
            return Err(Error::InvalidTransition);
        }
        let cancelled = self
            .store
            .set_order_status(order_id, OrderStatus::Cancelled)
            .await?;
        // Restore the reserved quantities. Each restore is itself atomic;
        // a failed one is logged and left to staff correction.
        for line in &cancelled.items {
            if let Err(e) = self.store.adjust_stock(line.product_id, line.quantity).await {
                tracing::error!(
                    order_id = %order_id,
                    product_id = %line.product_id,
                    error = %e,
                    "failed to restore stock on cancellation"
                );
            }
        }
        self.events
            .publish(DomainEvent::OrderCancelled { order_id })
            .await;
        Ok(cancelled)
    }

    /// Staff override: any recognized status may follow any other. Stock is
    /// NOT restored on this path; restoration is exclusive to `cancel`.
    pub async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<Order> {
        let order = self.store.set_order_status(order_id, status).await?;
        self.events
            .publish(DomainEvent::OrderStatusChanged {
                order_id,
                status: status.as_str().to_string(),
            })
            .await;
        Ok(order)
    }

    pub async fn get(&self, order_id: Uuid, caller: Caller) -> Result<Order> {
        let order = self.store.order(order_id).await?.ok_or(Error::NotFound("order"))?;
        if !caller.is_staff() && order.customer_id != caller.user_id {
            return Err(Error::Forbidden);
        }
        Ok(order)
    }

    /// Customers are pinned to their own orders regardless of the filter.
    pub async fn list(
        &self,
        mut filter: OrderFilter,
        page: PageRequest,
        caller: Caller,
    ) -> Result<Page<Order>> {
        if !caller.is_staff() {
            filter.customer_id = Some(caller.user_id);
        }
        self.store.list_orders(&filter, page).await
    }
}
