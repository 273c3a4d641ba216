//! Receipt
//!
//! Terminal tables for carts and order history.

use std::io;

use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::CartLineItem,
    orders::LocalOrder,
    pricing::{PricingError, format_price, total_price},
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// An amount could not be formatted.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    Io,
}

/// Writes the lines of a cart followed by its unit count and total.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if an amount cannot be formatted or the output
/// cannot be written.
pub fn write_cart(
    mut out: impl io::Write,
    items: &[CartLineItem],
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    if items.is_empty() {
        return writeln!(out, "Cart is empty.").map_err(|_err| ReceiptError::Io);
    }

    write_lines_table(&mut out, items, currency)?;

    let units: u64 = items.iter().map(|item| u64::from(item.quantity())).sum();

    write_summary(
        &mut out,
        &[
            ("Items:", units.to_string()),
            ("Total:", format_price(total_price(items), currency)?),
        ],
    )
}

/// Writes one row per order, newest first as given.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if an amount cannot be formatted or the output
/// cannot be written.
pub fn write_orders(
    mut out: impl io::Write,
    orders: &[LocalOrder],
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    if orders.is_empty() {
        return writeln!(out, "No orders yet.").map_err(|_err| ReceiptError::Io);
    }

    let mut builder = Builder::default();
    builder.push_record(["Order", "Placed", "Customer", "Items", "Total", "Status"]);

    for order in orders {
        builder.push_record([
            order.id().to_string(),
            order.created_at().to_string(),
            order.customer().name.clone(),
            order.item_count().to_string(),
            format_price(order.total(), currency)?,
            order.status().to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..5), Alignment::right());

    writeln!(out, "{table}").map_err(|_err| ReceiptError::Io)
}

/// Writes a single order: its header, its lines and its stored total.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if an amount cannot be formatted or the output
/// cannot be written.
pub fn write_order(
    mut out: impl io::Write,
    order: &LocalOrder,
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    let customer = order.customer();

    writeln!(
        out,
        "Order {} ({})\nPlaced {}\nShip to {}, {} ({})",
        order.id(),
        order.status(),
        order.created_at(),
        customer.name,
        customer.address,
        customer.phone,
    )
    .map_err(|_err| ReceiptError::Io)?;

    write_lines_table(&mut out, order.items(), currency)?;

    write_summary(
        &mut out,
        &[
            ("Items:", order.item_count().to_string()),
            ("Total:", format_price(order.total(), currency)?),
        ],
    )
}

fn write_lines_table(
    out: &mut impl io::Write,
    items: &[CartLineItem],
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();
    builder.push_record(["", "Item", "Color", "Unit Price", "Qty", "Line Total"]);

    for (idx, item) in items.iter().enumerate() {
        builder.push_record([
            format!("#{}", idx + 1),
            item.name().to_string(),
            item.color().unwrap_or("-").to_string(),
            format_price(item.unit_price(), currency)?,
            item.quantity().to_string(),
            format_price(item.line_total(), currency)?,
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::Io)
}

fn write_summary(
    out: &mut impl io::Write,
    lines: &[(&str, String)],
) -> Result<(), ReceiptError> {
    let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = lines.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in lines {
        writeln!(out, " {label:<label_width$} {value:>value_width$}")
            .map_err(|_err| ReceiptError::Io)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::Io)
}
