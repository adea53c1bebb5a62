//! Domain events published on the message bus

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    OrderPlaced {
        order_id: Uuid,
        customer_id: Uuid,
        total: Decimal,
    },
    OrderStatusChanged {
        order_id: Uuid,
        status: String,
    },
    OrderCancelled {
        order_id: Uuid,
    },
    StockAdjusted {
        product_id: Uuid,
        delta: i64,
        remaining: i64,
    },
    InquiryReceived {
        inquiry_id: Uuid,
        inquiry_type: String,
    },
}

impl DomainEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::OrderPlaced { .. } => "threadfront.orders.placed",
            Self::OrderStatusChanged { .. } => "threadfront.orders.status",
            Self::OrderCancelled { .. } => "threadfront.orders.cancelled",
            Self::StockAdjusted { .. } => "threadfront.stock.adjusted",
            Self::InquiryReceived { .. } => "threadfront.inquiries.received",
        }
    }
}
