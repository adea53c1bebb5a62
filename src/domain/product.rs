//! Product catalog types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Closed set of thread categories carried by the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Silkyarn,
    Poly,
    Yarn,
    Zari,
    Cottonyarn,
    Raw,
    Dyed,
    Specialty,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silkyarn => "silkyarn",
            Self::Poly => "poly",
            Self::Yarn => "yarn",
            Self::Zari => "zari",
            Self::Cottonyarn => "cottonyarn",
            Self::Raw => "raw",
            Self::Dyed => "dyed",
            Self::Specialty => "specialty",
        }
    }
}

impl FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "silkyarn" => Ok(Self::Silkyarn),
            "poly" => Ok(Self::Poly),
            "yarn" => Ok(Self::Yarn),
            "zari" => Ok(Self::Zari),
            "cottonyarn" => Ok(Self::Cottonyarn),
            "raw" => Ok(Self::Raw),
            "dyed" => Ok(Self::Dyed),
            "specialty" => Ok(Self::Specialty),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quality grades used by the trade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
        }
    }
}

impl FromStr for Quality {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A+" => Ok(Self::APlus),
            "A" => Ok(Self::A),
            "B+" => Ok(Self::BPlus),
            "B" => Ok(Self::B),
            other => Err(format!("unknown quality '{other}'")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub images: Vec<String>,
    pub category: Category,
    pub color: String,
    /// Denier descriptor, e.g. "20/22" or "13/15".
    pub weight: String,
    pub origin: String,
    pub quality: Quality,
    /// Staff-settable availability override; the inventory adjuster
    /// forces it false when stock hits zero and true on restock.
    pub in_stock: bool,
    pub stock_quantity: i64,
    pub rating: f64,
    pub reviews: i64,
    pub tags: Vec<String>,
    pub featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Staff-supplied fields for creating or replacing a product.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: Category,
    pub color: String,
    pub weight: String,
    pub origin: String,
    pub quality: Quality,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    pub fn create(draft: ProductDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            original_price: draft.original_price,
            images: draft.images,
            category: draft.category,
            color: draft.color,
            weight: draft.weight,
            origin: draft.origin,
            quality: draft.quality,
            in_stock: draft.in_stock,
            stock_quantity: draft.stock_quantity,
            rating: draft.rating,
            reviews: draft.reviews,
            tags: draft.tags,
            featured: draft.featured,
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the staff-editable fields, keeping identity and timestamps.
    pub fn apply(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.price = draft.price;
        self.original_price = draft.original_price;
        self.images = draft.images;
        self.category = draft.category;
        self.color = draft.color;
        self.weight = draft.weight;
        self.origin = draft.origin;
        self.quality = draft.quality;
        self.in_stock = draft.in_stock;
        self.stock_quantity = draft.stock_quantity;
        self.rating = draft.rating;
        self.reviews = draft.reviews;
        self.tags = draft.tags;
        self.featured = draft.featured;
        self.is_active = draft.is_active;
        self.updated_at = Utc::now();
    }

    pub fn available(&self) -> bool {
        self.is_active && self.in_stock && self.stock_quantity > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Premium Silkyarn - Natural White".into(),
            description: "High-quality silk yarn".into(),
            price: Decimal::new(2500, 0),
            original_price: Some(Decimal::new(3000, 0)),
            images: vec![],
            category: Category::Silkyarn,
            color: "Natural White".into(),
            weight: "20/22".into(),
            origin: "Karnataka".into(),
            quality: Quality::APlus,
            in_stock: true,
            stock_quantity: 50,
            rating: 4.8,
            reviews: 24,
            tags: vec!["premium".into()],
            featured: true,
            is_active: true,
        }
    }

    #[test]
    fn test_create_product() {
        let p = Product::create(draft());
        assert!(p.available());
        assert_eq!(p.category.as_str(), "silkyarn");
    }

    #[test]
    fn test_inactive_not_available() {
        let mut p = Product::create(draft());
        p.is_active = false;
        assert!(!p.available());
    }

    #[test]
    fn test_quality_round_trip() {
        assert_eq!("A+".parse::<Quality>().unwrap(), Quality::APlus);
        assert_eq!(Quality::BPlus.as_str().parse::<Quality>().unwrap(), Quality::BPlus);
        assert!("C".parse::<Quality>().is_err());
    }
}
