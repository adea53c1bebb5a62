//! Application services
pub mod auth;
pub mod catalog;
pub mod inquiries;
pub mod orders;

use std::sync::Arc;

use crate::store::Store;

pub use auth::{AuthService, Caller};
pub use catalog::CatalogService;
pub use inquiries::{InquiryService, Submission};
pub use orders::{ItemRequest, OrderService};

pub type SharedStore = Arc<dyn Store>;
