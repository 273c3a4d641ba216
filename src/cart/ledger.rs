//! Cart ledger

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    pricing::total_price,
    products::ProductId,
    storage::{CART_KEY, Storage, read_json, write_json},
};

use super::CartLineItem;

/// The shopper's cart, kept in memory and mirrored to storage after every
/// mutation.
///
/// Storage failures never reach the caller: they are logged and the in-memory
/// lines stay authoritative for the rest of the process.
#[derive(Debug)]
pub struct CartLedger<S> {
    storage: S,
    items: Vec<CartLineItem>,
}

impl<S: Storage> CartLedger<S> {
    /// Open the cart stored in `storage`.
    ///
    /// A missing, unreadable or corrupt stored cart opens as an empty cart.
    pub fn open(storage: S) -> Self {
        let items = hydrate(&storage);

        Self { storage, items }
    }

    /// Discard in-memory state and read the cart from storage again.
    pub fn reload(&mut self) {
        self.items = hydrate(&self.storage);
    }

    /// Lines in display order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// The line with the given product and colour, if present.
    pub fn get(&self, product_id: ProductId, color: Option<&str>) -> Option<&CartLineItem> {
        self.items
            .iter()
            .find(|item| item.matches(product_id, color))
    }

    /// Owned copy of the current lines.
    pub fn snapshot(&self) -> Vec<CartLineItem> {
        self.items.clone()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }

    /// Sum of `unit_price × quantity` over all lines.
    pub fn total(&self) -> Decimal {
        total_price(&self.items)
    }

    /// Add a line, merging into an existing line with the same product and
    /// colour by summing quantities.
    ///
    /// Quantities are not checked against the line's stock cap. An item with a
    /// quantity of zero is ignored.
    pub fn add(&mut self, item: CartLineItem) {
        if item.quantity() == 0 {
            debug!(product_id = %item.product_id(), "ignored empty cart line");
            return;
        }

        let existing = self
            .items
            .iter_mut()
            .find(|line| line.identity() == item.identity());

        if let Some(line) = existing {
            line.increase_quantity(item.quantity());

            debug!(
                product_id = %line.product_id(),
                color = line.color(),
                quantity = line.quantity(),
                "merged cart line"
            );
        } else {
            debug!(
                product_id = %item.product_id(),
                color = item.color(),
                quantity = item.quantity(),
                "appended cart line"
            );

            self.items.push(item);
        }

        self.persist();
    }

    /// Remove the line with the given product and colour. Missing lines are
    /// ignored.
    pub fn remove(&mut self, product_id: ProductId, color: Option<&str>) {
        let before = self.items.len();

        self.items.retain(|item| !item.matches(product_id, color));

        debug!(
            %product_id,
            color,
            removed = before - self.items.len(),
            "removed cart line"
        );

        self.persist();
    }

    /// Set a line's quantity exactly. A quantity of zero removes the line;
    /// missing lines are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32, color: Option<&str>) {
        if quantity == 0 {
            self.remove(product_id, color);
            return;
        }

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|item| item.matches(product_id, color))
        {
            line.set_quantity(quantity);

            debug!(%product_id, color, quantity, "updated cart line quantity");
        }

        self.persist();
    }

    /// Empty the cart and drop its storage key.
    ///
    /// If the key cannot be removed an empty cart is written in its place, so
    /// ordered lines never reappear on the next open.
    pub fn clear(&mut self) {
        self.items.clear();

        debug!("cleared cart");

        if let Err(source) = self.storage.remove(CART_KEY) {
            warn!(
                key = CART_KEY,
                error = %source,
                "failed to remove stored cart; overwriting with an empty cart"
            );

            self.persist();
        }
    }

    fn persist(&self) {
        if let Err(source) = write_json(&self.storage, CART_KEY, &self.items) {
            warn!(
                key = CART_KEY,
                error = %source,
                "failed to persist cart; keeping in-memory state"
            );
        }
    }
}

fn hydrate<S: Storage>(storage: &S) -> Vec<CartLineItem> {
    match read_json::<Vec<CartLineItem>, _>(storage, CART_KEY) {
        Ok(Some(stored)) => normalise(stored),
        Ok(None) => Vec::new(),
        Err(source) => {
            warn!(key = CART_KEY, error = %source, "discarding unreadable stored cart");

            Vec::new()
        }
    }
}

/// Drop empty lines and merge lines sharing an identity, keeping the position
/// of the first occurrence.
fn normalise(stored: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut items: Vec<CartLineItem> = Vec::with_capacity(stored.len());

    for item in stored.into_iter().filter(|item| item.quantity() > 0) {
        match items
            .iter_mut()
            .find(|line| line.identity() == item.identity())
        {
            Some(line) => line.increase_quantity(item.quantity()),
            None => items.push(item),
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate;
    use rust_decimal::dec;
    use testresult::TestResult;

    use crate::storage::{MemoryStore, MockStorage, StorageError};

    use super::*;

    fn widget(quantity: u32) -> CartLineItem {
        CartLineItem::new(ProductId::new(5), "Widget", dec!(10.00), quantity, None, 10)
    }

    fn shirt(color: &str, quantity: u32) -> CartLineItem {
        CartLineItem::new(
            ProductId::new(1),
            "Shirt",
            dec!(19.99),
            quantity,
            Some(color.to_string()),
            10,
        )
    }

    fn empty_cart() -> CartLedger<Arc<MemoryStore>> {
        CartLedger::open(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn opens_empty_when_nothing_is_stored() {
        let cart = empty_cart();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn adding_same_identity_merges_quantities() {
        let mut cart = empty_cart();

        cart.add(shirt("red", 1));
        cart.add(shirt("red", 2));
        cart.add(shirt("red", 4));

        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.get(ProductId::new(1), Some("red"))
                .map(CartLineItem::quantity),
            Some(7)
        );
    }

    #[test]
    fn different_colours_are_distinct_lines() {
        let mut cart = empty_cart();

        cart.add(shirt("red", 1));
        cart.add(shirt("blue", 1));

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn colourless_line_does_not_merge_with_coloured_line() {
        let mut cart = empty_cart();

        cart.add(CartLineItem::new(ProductId::new(1), "Shirt", dec!(19.99), 1, None, 10));
        cart.add(shirt("red", 1));

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn lines_keep_insertion_order() {
        let mut cart = empty_cart();

        cart.add(shirt("red", 1));
        cart.add(widget(1));
        cart.add(shirt("red", 1));

        let ids: Vec<_> = cart.items().iter().map(CartLineItem::product_id).collect();

        assert_eq!(ids, [ProductId::new(1), ProductId::new(5)]);
    }

    #[test]
    fn add_does_not_enforce_stock_cap() {
        let mut cart = empty_cart();

        cart.add(widget(8));
        cart.add(widget(8));

        assert_eq!(
            cart.get(ProductId::new(5), None)
                .map(CartLineItem::quantity),
            Some(16)
        );
    }

    #[test]
    fn remove_twice_matches_remove_once() {
        let mut once = empty_cart();
        let mut twice = empty_cart();

        for cart in [&mut once, &mut twice] {
            cart.add(shirt("red", 1));
            cart.add(shirt("blue", 2));
        }

        once.remove(ProductId::new(1), Some("red"));
        twice.remove(ProductId::new(1), Some("red"));
        twice.remove(ProductId::new(1), Some("red"));

        assert_eq!(once.items(), twice.items());
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn remove_only_matches_exact_colour() {
        let mut cart = empty_cart();

        cart.add(shirt("red", 1));
        cart.remove(ProductId::new(1), None);

        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn update_quantity_replaces_rather_than_increments() {
        let mut cart = empty_cart();

        cart.add(widget(3));
        cart.update_quantity(ProductId::new(5), 5, None);

        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn update_quantity_to_zero_matches_remove() {
        let mut updated = empty_cart();
        let mut removed = empty_cart();

        for cart in [&mut updated, &mut removed] {
            cart.add(shirt("red", 2));
            cart.add(widget(1));
        }

        updated.update_quantity(ProductId::new(1), 0, Some("red"));
        removed.remove(ProductId::new(1), Some("red"));

        assert_eq!(updated.items(), removed.items());
        assert!(updated.get(ProductId::new(1), Some("red")).is_none());
    }

    #[test]
    fn update_quantity_for_missing_line_is_a_no_op() {
        let mut cart = empty_cart();

        cart.add(widget(1));
        cart.update_quantity(ProductId::new(99), 4, None);

        assert_eq!(cart.items(), [widget(1)]);
    }

    #[test]
    fn item_count_sums_quantities_not_lines() {
        let mut cart = empty_cart();

        cart.add(shirt("red", 2));
        cart.add(widget(3));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn total_is_recomputed_after_each_mutation() {
        let mut cart = empty_cart();

        cart.add(widget(2));
        assert_eq!(cart.total(), dec!(20.00));

        cart.add(shirt("red", 1));
        assert_eq!(cart.total(), dec!(39.99));

        cart.remove(ProductId::new(5), None);
        assert_eq!(cart.total(), dec!(19.99));
    }

    #[test]
    fn mutations_are_written_through_to_storage() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let mut cart = CartLedger::open(Arc::clone(&store));

        cart.add(shirt("red", 2));
        cart.add(widget(1));

        let reopened = CartLedger::open(Arc::clone(&store));

        assert_eq!(reopened.items(), cart.items());

        Ok(())
    }

    #[test]
    fn clear_removes_storage_key() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let mut cart = CartLedger::open(Arc::clone(&store));

        cart.add(widget(1));
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(store.get(CART_KEY)?, None);

        Ok(())
    }

    #[test]
    fn corrupt_storage_opens_as_empty_cart() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        store.set(CART_KEY, "{not json")?;

        let cart = CartLedger::open(Arc::clone(&store));

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn hydration_merges_duplicate_and_drops_empty_lines() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        store.set(
            CART_KEY,
            r#"[
                {"id":1,"name":"Shirt","price":"19.99","quantity":1,"color":"red","stock":10},
                {"id":5,"name":"Widget","price":"10.00","quantity":0,"stock":10},
                {"id":1,"name":"Shirt","price":"19.99","quantity":2,"color":"red","stock":10}
            ]"#,
        )?;

        let cart = CartLedger::open(Arc::clone(&store));

        assert_eq!(cart.items(), [shirt("red", 3)]);

        Ok(())
    }

    #[test]
    fn reload_picks_up_external_writes() {
        let store = Arc::new(MemoryStore::new());
        let mut cart = CartLedger::open(Arc::clone(&store));
        let mut other = CartLedger::open(Arc::clone(&store));

        other.add(widget(2));
        assert!(cart.is_empty());

        cart.reload();
        assert_eq!(cart.items(), [widget(2)]);
    }

    #[test]
    fn write_failures_keep_in_memory_state() {
        let mut storage = MockStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .returning(|_, _| Err(StorageError::Unavailable));

        let mut cart = CartLedger::open(storage);

        cart.add(widget(2));
        cart.add(shirt("red", 1));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total(), dec!(39.99));
    }

    #[test]
    fn read_failures_open_as_empty_cart() {
        let mut storage = MockStorage::new();
        storage
            .expect_get()
            .returning(|_| Err(StorageError::Unavailable));

        let cart = CartLedger::open(storage);

        assert!(cart.is_empty());
    }

    #[test]
    fn quota_failures_keep_in_memory_state() -> TestResult {
        let store = Arc::new(MemoryStore::with_quota(16));
        let mut cart = CartLedger::open(Arc::clone(&store));

        cart.add(widget(1));

        assert_eq!(cart.len(), 1);
        assert_eq!(store.get(CART_KEY)?, None);

        Ok(())
    }

    #[test]
    fn clear_failure_still_empties_memory() {
        let mut storage = MockStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage.expect_set().returning(|_, _| Ok(()));
        storage
            .expect_remove()
            .returning(|_| Err(StorageError::Unavailable));

        let mut cart = CartLedger::open(storage);

        cart.add(widget(1));
        cart.clear();

        assert!(cart.is_empty());
    }

    #[test]
    fn clear_failure_overwrites_stored_cart_with_empty_list() {
        let mut storage = MockStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .with(predicate::eq(CART_KEY), predicate::ne("[]"))
            .times(1)
            .returning(|_, _| Ok(()));
        storage
            .expect_set()
            .with(predicate::eq(CART_KEY), predicate::eq("[]"))
            .times(1)
            .returning(|_, _| Ok(()));
        storage
            .expect_remove()
            .times(1)
            .returning(|_| Err(StorageError::Unavailable));

        let mut cart = CartLedger::open(storage);

        cart.add(widget(1));
        cart.clear();

        assert!(cart.is_empty());
    }

    #[test]
    fn adding_zero_quantity_is_ignored() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let mut cart = CartLedger::open(Arc::clone(&store));

        cart.add(widget(0));

        assert!(cart.is_empty());
        assert_eq!(store.get(CART_KEY)?, None);

        cart.add(widget(2));
        cart.add(widget(0));

        let reopened = CartLedger::open(Arc::clone(&store));

        assert_eq!(cart.items(), [widget(2)]);
        assert_eq!(reopened.items(), cart.items());

        Ok(())
    }
}
