//! Checkout
//!
//! Turns the current cart, or a single product ordered from its page, into a
//! local order. The order history is written before anything else changes, so
//! a failed write leaves the cart untouched and no partial order in the
//! history.

use jiff::Timestamp;
use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::{CartLedger, CartLineItem},
    customers::{CustomerInfo, CustomerStore, ValidationErrors},
    orders::{LocalOrder, OrderId, OrderLedger},
    products::Product,
    storage::{Storage, StorageError},
};

/// Errors that can occur while submitting an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing in the cart to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The customer form has field errors.
    #[error(transparent)]
    InvalidCustomer(#[from] ValidationErrors),

    /// The order history could not be written.
    #[error("failed to record order")]
    Storage(#[from] StorageError),
}

/// Submit the cart as a new pending order created now.
///
/// # Errors
///
/// See [`submit_order_with`].
pub fn submit_order<C, O>(
    cart: &mut CartLedger<C>,
    orders: &mut OrderLedger<O>,
    customer: CustomerInfo,
) -> Result<LocalOrder, CheckoutError>
where
    C: Storage,
    O: Storage,
{
    submit_order_with(
        cart,
        orders,
        customer,
        Timestamp::now(),
        &mut rand::thread_rng(),
    )
}

/// Submit the cart as a new pending order created at `now`, drawing the order
/// id suffix from `rng`.
///
/// On success the order is at the front of `orders` and the cart is empty.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: the cart has no lines.
/// - [`CheckoutError::InvalidCustomer`]: `customer` fails validation.
/// - [`CheckoutError::Storage`]: the order history could not be written; the
///   cart and history are unchanged.
pub fn submit_order_with<C, O>(
    cart: &mut CartLedger<C>,
    orders: &mut OrderLedger<O>,
    customer: CustomerInfo,
    now: Timestamp,
    rng: &mut impl Rng,
) -> Result<LocalOrder, CheckoutError>
where
    C: Storage,
    O: Storage,
{
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    customer.validate()?;

    let order = LocalOrder::new(OrderId::generate(now, rng), cart.snapshot(), customer, now);

    orders.record(order.clone()).inspect_err(|source| {
        warn!(order_id = %order.id(), error = %source, "order submission failed");
    })?;

    cart.clear();

    info!(
        order_id = %order.id(),
        total = %order.total(),
        "order submitted"
    );

    Ok(order)
}

/// Order `quantity` units of `product` directly, without touching the cart.
///
/// # Errors
///
/// See [`submit_product_order_with`].
pub fn submit_product_order<O, C>(
    orders: &mut OrderLedger<O>,
    customers: &CustomerStore<C>,
    product: &Product,
    quantity: u32,
    color: Option<&str>,
    customer: CustomerInfo,
) -> Result<LocalOrder, CheckoutError>
where
    O: Storage,
    C: Storage,
{
    submit_product_order_with(
        orders,
        customers,
        product,
        quantity,
        color,
        customer,
        Timestamp::now(),
        &mut rand::thread_rng(),
    )
}

/// Order a single product created at `now`, drawing the order id suffix from
/// `rng`.
///
/// The order holds one line snapshotted from `product`, with the quantity
/// clamped to `1..=max(stock, 1)`. On success the customer details are saved
/// for the next order.
///
/// # Errors
///
/// - [`CheckoutError::InvalidCustomer`]: `customer` fails validation.
/// - [`CheckoutError::Storage`]: the order history could not be written;
///   nothing is saved.
#[expect(
    clippy::too_many_arguments,
    reason = "mirrors the product page form plus the injected clock and rng"
)]
pub fn submit_product_order_with<O, C>(
    orders: &mut OrderLedger<O>,
    customers: &CustomerStore<C>,
    product: &Product,
    quantity: u32,
    color: Option<&str>,
    customer: CustomerInfo,
    now: Timestamp,
    rng: &mut impl Rng,
) -> Result<LocalOrder, CheckoutError>
where
    O: Storage,
    C: Storage,
{
    customer.validate()?;

    let item = CartLineItem::from_product(product, quantity, color);
    let order = LocalOrder::new(OrderId::generate(now, rng), vec![item], customer, now);

    orders.record(order.clone()).inspect_err(|source| {
        warn!(order_id = %order.id(), error = %source, "product order submission failed");
    })?;

    customers.save(order.customer());

    info!(
        order_id = %order.id(),
        product_id = %product.id,
        total = %order.total(),
        "product order submitted"
    );

    Ok(order)
}
