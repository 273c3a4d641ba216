//! Cart

mod items;
mod ledger;

pub use items::{CartLineItem, LineIdentity};
pub use ledger::CartLedger;
