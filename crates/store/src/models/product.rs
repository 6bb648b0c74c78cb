//! Catalog models: products and categories.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orchard_core::{CategoryId, ProductId, SubCategoryId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    /// CSS class of the category icon.
    pub icon: String,
}

/// A subcategory nested under a parent category.
///
/// Subcategories refine navigation only; products reference their parent
/// category directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: SubCategoryId,
    pub category_id: CategoryId,
    pub name: String,
    pub slug: String,
    /// CSS class of the subcategory icon, if one was set.
    pub icon: Option<String>,
}

/// A catalog product.
///
/// Prices are in the base currency with two fraction digits. `price >= 0`
/// and `stock >= 0` are enforced by the schema; rows violating them are
/// rejected as data corruption when loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub category_id: CategoryId,
    pub description: String,
    /// Unit price in the base currency.
    pub price: Decimal,
    /// Relative path of the product image, if one was uploaded.
    pub image: Option<String>,
    /// Shown on the home page when set.
    pub is_featured: bool,
    /// Units available. Cart quantities are clamped against this.
    pub stock: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether at least one unit can be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
