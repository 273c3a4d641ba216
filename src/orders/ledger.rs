//! Order ledger

use tracing::{debug, info, warn};

use crate::storage::{ORDERS_KEY, Storage, StorageError, read_json, write_json};

use super::{LocalOrder, OrderId, OrderStatus};

/// Order history for this device, newest first, mirrored to storage after every
/// mutation.
#[derive(Debug)]
pub struct OrderLedger<S> {
    storage: S,
    orders: Vec<LocalOrder>,
}

impl<S: Storage> OrderLedger<S> {
    /// Open the order history stored in `storage`.
    ///
    /// A missing, unreadable or corrupt history opens as empty.
    pub fn open(storage: S) -> Self {
        let orders = hydrate(&storage);

        Self { storage, orders }
    }

    /// Discard in-memory state and read the history from storage again.
    pub fn reload(&mut self) {
        self.orders = hydrate(&self.storage);
    }

    /// Orders, newest first.
    pub fn orders(&self) -> &[LocalOrder] {
        &self.orders
    }

    /// The order with the given id, if present.
    pub fn find(&self, id: &OrderId) -> Option<&LocalOrder> {
        self.orders.iter().find(|order| order.id() == id)
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether there are no orders.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Prepend `order` to the history.
    ///
    /// Identical orders are kept as separate entries. A failed write is logged
    /// and the order kept in memory.
    pub fn add_order(&mut self, order: LocalOrder) {
        let id = order.id().clone();

        self.orders.insert(0, order);

        debug!(order_id = %id, "added order");

        self.persist();
    }

    /// Prepend `order` and write the history, undoing the prepend if the
    /// write fails.
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] raised while writing the history.
    pub fn record(&mut self, order: LocalOrder) -> Result<(), StorageError> {
        self.orders.insert(0, order);

        if let Err(source) = write_json(&self.storage, ORDERS_KEY, &self.orders) {
            self.orders.remove(0);

            return Err(source);
        }

        if let Some(order) = self.orders.first() {
            info!(
                order_id = %order.id(),
                total = %order.total(),
                items = order.item_count(),
                "recorded order"
            );
        }

        Ok(())
    }

    /// Set the status of the order with the given id. Unknown ids are ignored.
    pub fn update_status(&mut self, id: &OrderId, status: OrderStatus) {
        let Some(order) = self.orders.iter_mut().find(|order| order.id() == id) else {
            debug!(order_id = %id, "no order to update");
            return;
        };

        let previous = order.status();
        order.set_status(status);

        debug!(order_id = %id, %previous, %status, "updated order status");

        self.persist();
    }

    /// Forget every order and drop the storage key.
    pub fn clear_all(&mut self) {
        self.orders.clear();

        debug!("cleared order history");

        if let Err(source) = self.storage.remove(ORDERS_KEY) {
            warn!(key = ORDERS_KEY, error = %source, "failed to clear stored orders");
        }
    }

    fn persist(&self) {
        if let Err(source) = write_json(&self.storage, ORDERS_KEY, &self.orders) {
            warn!(
                key = ORDERS_KEY,
                error = %source,
                "failed to persist orders; keeping in-memory state"
            );
        }
    }
}

fn hydrate<S: Storage>(storage: &S) -> Vec<LocalOrder> {
    match read_json(storage, ORDERS_KEY) {
        Ok(orders) => orders.unwrap_or_default(),
        Err(source) => {
            warn!(key = ORDERS_KEY, error = %source, "discarding unreadable stored orders");

            Vec::new()
        }
    }
}
