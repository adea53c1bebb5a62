//! Order types and status rules

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Cancellation is barred once an order is delivered or already cancelled.
    pub fn cancellable(&self) -> bool {
        !matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status '{other}'")),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One (product, quantity, captured price) tuple. The price is a snapshot
/// taken at order time, never a live reference to the catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub price: Decimal,
}

impl LineItem {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub zip: String,
    pub country: String,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds a pending order from captured line items. The total is the sum
    /// of line subtotals and stays fixed for the life of the order.
    pub fn place(
        customer_id: Uuid,
        items: Vec<LineItem>,
        shipping_address: ShippingAddress,
        payment_method: String,
        notes: Option<String>,
    ) -> Self {
        let total_amount = items.iter().map(LineItem::subtotal).sum();
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            order_number: format!("ORD-{:08}", rand::random::<u32>() % 100_000_000),
            customer_id,
            items,
            total_amount,
            shipping_address,
            payment_method,
            notes,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
