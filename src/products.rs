//! Products
//!
//! The storefront's product read-model. The cart only reads it when building a
//! line-item snapshot and never re-queries it afterwards.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product identifier, as assigned by the catalogue backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wrap a raw catalogue id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw catalogue id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Current unit price
    pub price: Decimal,

    /// Units available
    pub stock: u32,

    /// Colours the product can be ordered in
    #[serde(default)]
    pub color_options: Vec<String>,
}

impl Product {
    /// Whether any units are available.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether `color` is one of the product's colour options.
    pub fn has_color(&self, color: &str) -> bool {
        self.color_options.iter().any(|option| option == color)
    }
}
