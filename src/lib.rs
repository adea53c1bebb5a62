//! Threadfront - Self-hosted Storefront Service
//!
//! Storefront backend for a textile thread business.
//!
//! ## Features
//! - Product catalog management
//! - Order placement with atomic stock reservation
//! - Customer inquiry / preorder intake
//! - Token-based sessions with customer/staff roles

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod publish;
pub mod service;
pub mod store;

pub use error::{Error, Result};
