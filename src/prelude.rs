//! Storefront Ledger prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartLedger, CartLineItem, LineIdentity},
    checkout::{
        CheckoutError, submit_order, submit_order_with, submit_product_order,
        submit_product_order_with,
    },
    customers::{CustomerField, CustomerInfo, CustomerStore, FieldError, ValidationErrors},
    orders::{LocalOrder, OrderId, OrderLedger, OrderStatus, ParseOrderStatusError},
    pricing::{PricingError, format_price, to_money, total_price},
    products::{Product, ProductId},
    receipt::{ReceiptError, write_cart, write_order, write_orders},
    storage::{FileStore, MemoryStore, Storage, StorageError},
};
