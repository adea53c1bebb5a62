//! Domain types
pub mod events;
pub mod inquiry;
pub mod order;
pub mod product;
pub mod user;

pub use events::DomainEvent;
pub use inquiry::{Inquiry, InquiryResponse, InquiryStatus, InquiryType};
pub use order::{LineItem, Order, OrderStatus, ShippingAddress};
pub use product::{Category, Product, ProductDraft, Quality};
pub use user::{Role, Session, User};
