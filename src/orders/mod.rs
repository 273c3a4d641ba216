//! Orders
//!
//! Orders submitted from this device, each a frozen snapshot of the cart at
//! submission time.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{cart::CartLineItem, customers::CustomerInfo, pricing::total_price};

mod ids;
mod ledger;

pub use ids::OrderId;
pub use ledger::OrderLedger;

/// Local order status. Any status may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Submitted, awaiting confirmation.
    #[default]
    Pending,

    /// Confirmed by the shop.
    Confirmed,

    /// Cancelled.
    Cancelled,
}

impl OrderStatus {
    /// Lowercase name used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown order status name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status `{0}`")]
pub struct ParseOrderStatusError(String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseOrderStatusError(s.to_string())),
        }
    }
}

/// An order submitted from this device.
///
/// Items and total are fixed at creation; only the status may change, through
/// [`OrderLedger::update_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalOrder {
    id: OrderId,
    items: Vec<CartLineItem>,
    customer: CustomerInfo,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    total: Decimal,
    created_at: Timestamp,
    #[serde(default)]
    status: OrderStatus,
}

impl LocalOrder {
    /// Create a pending order from a snapshot of cart lines.
    ///
    /// The total is computed from `items`.
    pub fn new(
        id: OrderId,
        items: Vec<CartLineItem>,
        customer: CustomerInfo,
        created_at: Timestamp,
    ) -> Self {
        let total = total_price(&items);

        Self {
            id,
            items,
            customer,
            total,
            created_at,
            status: OrderStatus::Pending,
        }
    }

    /// Order id
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Lines as they were at submission.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Customer details as submitted.
    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    /// Order total at submission.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Submission time.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Total units ordered.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }

    pub(crate) fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }
}
