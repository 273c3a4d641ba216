//! Cart line-items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::{Product, ProductId};

/// Identity of a line-item within a cart: the product and the chosen colour.
///
/// Two lines for the same product in different colours are distinct entries;
/// a line without a colour only matches another line without a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineIdentity<'a> {
    /// Product the line refers to.
    pub product_id: ProductId,

    /// Chosen colour, if any.
    pub color: Option<&'a str>,
}

/// A product snapshot in the cart.
///
/// Name, unit price and stock are copied from the product when the line is
/// created and never refreshed, so later catalogue changes do not alter the
/// cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(rename = "id")]
    product_id: ProductId,

    name: String,

    #[serde(rename = "price", serialize_with = "rust_decimal::serde::float::serialize")]
    unit_price: Decimal,

    quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,

    #[serde(rename = "stock", default)]
    stock_cap: u32,
}

impl CartLineItem {
    /// Creates a line-item from raw snapshot values.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
        color: Option<String>,
        stock_cap: u32,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price,
            quantity,
            color,
            stock_cap,
        }
    }

    /// Snapshots `product` into a new line-item.
    ///
    /// The quantity is clamped to `1..=stock`, treating an out-of-stock product
    /// as allowing a single unit, matching the product page's quantity picker.
    pub fn from_product(product: &Product, quantity: u32, color: Option<&str>) -> Self {
        let quantity = quantity.clamp(1, product.stock.max(1));

        Self::new(
            product.id,
            product.name.clone(),
            product.price,
            quantity,
            color.map(str::to_string),
            product.stock,
        )
    }

    /// Product the line refers to.
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Product name at the time the line was added.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price at the time the line was added.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Number of units.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Chosen colour, if any.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Stock available when the line was added.
    pub fn stock_cap(&self) -> u32 {
        self.stock_cap
    }

    /// `unit_price × quantity`.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// The line's identity within a cart.
    pub fn identity(&self) -> LineIdentity<'_> {
        LineIdentity {
            product_id: self.product_id,
            color: self.color(),
        }
    }

    /// Whether this line has the given product and colour.
    pub fn matches(&self, product_id: ProductId, color: Option<&str>) -> bool {
        self.product_id == product_id && self.color() == color
    }

    /// Whether the cart UI may offer one more unit of this line.
    ///
    /// Advisory only; the ledger itself accepts any quantity.
    pub fn can_increment(&self) -> bool {
        self.quantity < self.stock_cap
    }

    pub(crate) fn increase_quantity(&mut self, by: u32) {
        self.quantity = self.quantity.saturating_add(by);
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}
