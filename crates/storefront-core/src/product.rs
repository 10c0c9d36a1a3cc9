//! # Catalog Types
//!
//! Read-only reference data: products, categories and home-screen banners.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Category     │   │     Banner      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id ◄───────────┼───│  link           │       │
//! │  │  price (Money)  │   │  name           │   │  title          │       │
//! │  │  category ──────┼──►│  product_count  │   │  button_text    │       │
//! │  │  colors / sizes │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart and orders never mutate these; they hold product ids (cart) or
//! frozen copies (placed orders).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available in the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Current price.
    pub price: Money,

    /// Pre-discount price shown struck through, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,

    pub description: String,

    /// Image URLs, first one is the thumbnail.
    pub images: Vec<String>,

    /// Average rating, 0.0 to 5.0.
    pub rating: f32,

    pub review_count: u32,

    /// Category id (see [`Category::id`]).
    pub category: String,

    pub tags: Vec<String>,

    /// Selectable colors (hex strings), if the product has color variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,

    /// Selectable sizes, if the product has size variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,

    pub in_stock: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,

    /// Discount percentage, 0 to 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,
}

impl Product {
    /// Featured on the home screen.
    #[inline]
    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }

    /// Listed under "New Arrivals".
    #[inline]
    pub fn is_new_arrival(&self) -> bool {
        self.is_new.unwrap_or(false)
    }

    /// Has a non-zero discount.
    #[inline]
    pub fn is_discounted(&self) -> bool {
        self.discount.is_some_and(|d| d > 0)
    }

    /// Whether the product page should show a color or size picker.
    pub fn has_variant_options(&self) -> bool {
        self.colors.as_ref().is_some_and(|c| !c.is_empty())
            || self.sizes.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Amount saved against `original_price`, zero when not discounted.
    pub fn savings(&self) -> Money {
        match self.original_price {
            Some(original) if original > self.price => original - self.price,
            _ => Money::zero(),
        }
    }

    /// First image, used as the thumbnail.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

// =============================================================================
// Category
// =============================================================================

/// A browsable product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Marketing count shown on the tile, not derived from the fixture set.
    pub product_count: u32,
}

// =============================================================================
// Banner
// =============================================================================

/// A promotional banner on the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Banner {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub button_text: String,
    /// In-app route, e.g. `/category/clothing`.
    pub link: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
