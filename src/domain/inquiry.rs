//! Contact / preorder inquiry types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryType {
    #[default]
    General,
    Product,
    Bulk,
    Preorder,
    Custom,
}

impl InquiryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Product => "product",
            Self::Bulk => "bulk",
            Self::Preorder => "preorder",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for InquiryType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Self::General),
            "product" => Ok(Self::Product),
            "bulk" => Ok(Self::Bulk),
            "preorder" => Ok(Self::Preorder),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown inquiry type '{other}'")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    New,
    Read,
    Replied,
    Closed,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for InquiryStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "read" => Ok(Self::Read),
            "replied" => Ok(Self::Replied),
            "closed" => Ok(Self::Closed),
            other => Err(format!("unknown inquiry status '{other}'")),
        }
    }
}

/// Staff reply attached to an inquiry.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryResponse {
    pub message: String,
    pub responded_by: Uuid,
    pub responded_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub inquiry_type: InquiryType,
    /// Set for preorder inquiries referencing a catalog product.
    pub product_id: Option<Uuid>,
    pub quantity: Option<i64>,
    pub status: InquiryStatus,
    pub assigned_to: Option<Uuid>,
    pub response: Option<InquiryResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inquiry {
    pub fn submit(
        name: String,
        email: String,
        phone: Option<String>,
        subject: String,
        message: String,
        inquiry_type: InquiryType,
        product_id: Option<Uuid>,
        quantity: Option<i64>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            phone,
            subject,
            message,
            inquiry_type,
            product_id,
            quantity,
            status: InquiryStatus::New,
            assigned_to: None,
            response: None,
            created_at: now,
            updated_at: now,
        }
    }
}
