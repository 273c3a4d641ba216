//! Storefront Ledger
//!
//! Client-side cart and local order history for a storefront, persisted as
//! JSON documents in a key/value store.

pub mod cart;
pub mod checkout;
pub mod customers;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod storage;
