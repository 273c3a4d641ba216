//! Storefront CLI commands

use std::{
    io::{self, Write},
    sync::Arc,
};

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;

use storefront_ledger::{
    cart::{CartLedger, CartLineItem},
    checkout::{CheckoutError, submit_order, submit_product_order},
    customers::{CustomerInfo, CustomerStore},
    orders::{OrderId, OrderLedger, OrderStatus},
    pricing::format_price,
    products::{Product, ProductId},
    receipt::{ReceiptError, write_cart, write_order, write_orders},
    storage::FileStore,
};

use crate::config::Config;

/// Errors surfaced by a command.
#[derive(Debug, Error)]
pub(crate) enum CommandError {
    /// The order could not be submitted.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Output could not be rendered.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// Output could not be written.
    #[error("failed to write output")]
    Io(#[from] io::Error),

    /// No order has the requested id.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// Checkout needs customer details that were neither given nor saved.
    #[error("missing customer {0}; pass it or save details with --remember")]
    MissingCustomerField(&'static str),
}

/// Top-level command.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Inspect or change the cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Submit the cart as a new order
    Checkout(CheckoutArgs),

    /// Order a single product directly, leaving the cart alone
    Buy(BuyArgs),

    /// Inspect or change the order history
    #[command(subcommand)]
    Orders(OrdersCommand),

    /// Inspect or forget the saved customer details
    #[command(subcommand)]
    Customer(CustomerCommand),
}

/// Cart commands.
#[derive(Debug, Subcommand)]
pub(crate) enum CartCommand {
    /// Show the cart
    Show,

    /// Add a product snapshot to the cart
    Add(AddArgs),

    /// Remove a line from the cart
    Remove(LineArgs),

    /// Set a line's quantity; zero removes it
    Set {
        #[command(flatten)]
        line: LineArgs,

        /// New quantity
        #[arg(short, long)]
        quantity: u32,
    },

    /// Empty the cart
    Clear,
}

/// A product snapshot to add.
#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Product id
    #[arg(long)]
    id: u64,

    /// Product name
    #[arg(long)]
    name: String,

    /// Unit price, e.g. 10.00
    #[arg(long)]
    price: Decimal,

    /// Units in stock
    #[arg(long)]
    stock: u32,

    /// Units to add
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,

    /// Chosen colour
    #[arg(short, long)]
    color: Option<String>,
}

/// A cart line's identity.
#[derive(Debug, Args)]
pub(crate) struct LineArgs {
    /// Product id
    #[arg(long)]
    id: u64,

    /// Colour of the line, if it has one
    #[arg(short, long)]
    color: Option<String>,
}

/// Customer details; saved details fill any that are omitted.
#[derive(Debug, Args)]
pub(crate) struct CustomerArgs {
    /// Customer name
    #[arg(long = "customer")]
    name: Option<String>,

    /// Customer phone number
    #[arg(long)]
    phone: Option<String>,

    /// Delivery address
    #[arg(long)]
    address: Option<String>,
}

/// Cart checkout.
#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    #[command(flatten)]
    customer: CustomerArgs,

    /// Save these details for the next checkout
    #[arg(long)]
    remember: bool,
}

/// A single product ordered from its page. The customer details are saved
/// when the order succeeds.
#[derive(Debug, Args)]
pub(crate) struct BuyArgs {
    /// Product id
    #[arg(long)]
    id: u64,

    /// Product name
    #[arg(long)]
    product: String,

    /// Unit price, e.g. 10.00
    #[arg(long)]
    price: Decimal,

    /// Units in stock
    #[arg(long)]
    stock: u32,

    /// Units to order
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,

    /// Chosen colour
    #[arg(short, long)]
    color: Option<String>,

    #[command(flatten)]
    customer: CustomerArgs,
}

/// Order history commands.
#[derive(Debug, Subcommand)]
pub(crate) enum OrdersCommand {
    /// List orders, or show one in detail
    Show {
        /// Order id
        id: Option<String>,
    },

    /// Set an order's status
    Status {
        /// Order id
        id: String,

        /// New status (pending, confirmed, cancelled)
        status: OrderStatus,
    },

    /// Forget every order
    Clear,
}

/// Saved customer commands.
#[derive(Debug, Subcommand)]
pub(crate) enum CustomerCommand {
    /// Show the saved details
    Show,

    /// Forget the saved details
    Forget,
}

/// Run the configured command against the configured store.
pub(crate) fn run(config: Config) -> Result<(), CommandError> {
    let store = Arc::new(FileStore::open(config.store.path));
    let currency = config.store.currency.currency();
    let mut out = io::stdout().lock();

    match config.command {
        Command::Cart(command) => run_cart(command, store, &mut out, currency),
        Command::Checkout(args) => run_checkout(&args, &store, &mut out, currency),
        Command::Buy(args) => run_buy(args, &store, &mut out, currency),
        Command::Orders(command) => run_orders(command, store, &mut out, currency),
        Command::Customer(command) => run_customer(&command, store, &mut out),
    }
}

fn run_cart(
    command: CartCommand,
    store: Arc<FileStore>,
    out: &mut impl Write,
    currency: &'static Currency,
) -> Result<(), CommandError> {
    let mut cart = CartLedger::open(store);

    match command {
        CartCommand::Show => {}
        CartCommand::Add(args) => {
            let product = Product {
                id: ProductId::new(args.id),
                name: args.name,
                price: args.price,
                stock: args.stock,
                color_options: args.color.iter().cloned().collect(),
            };

            cart.add(CartLineItem::from_product(
                &product,
                args.quantity,
                args.color.as_deref(),
            ));
        }
        CartCommand::Remove(line) => {
            cart.remove(ProductId::new(line.id), line.color.as_deref());
        }
        CartCommand::Set { line, quantity } => {
            cart.update_quantity(ProductId::new(line.id), quantity, line.color.as_deref());
        }
        CartCommand::Clear => cart.clear(),
    }

    write_cart(out, cart.items(), currency)?;

    Ok(())
}

fn run_checkout(
    args: &CheckoutArgs,
    store: &Arc<FileStore>,
    out: &mut impl Write,
    currency: &'static Currency,
) -> Result<(), CommandError> {
    let customers = CustomerStore::new(Arc::clone(store));
    let customer = resolve_customer(&args.customer, customers.load())?;

    let mut cart = CartLedger::open(Arc::clone(store));
    let mut orders = OrderLedger::open(Arc::clone(store));

    let order = submit_order(&mut cart, &mut orders, customer)?;

    if args.remember {
        customers.save(order.customer());
    }

    writeln!(
        out,
        "Placed order {} for {}",
        order.id(),
        format_price(order.total(), currency).map_err(ReceiptError::from)?
    )?;

    Ok(())
}

fn run_buy(
    args: BuyArgs,
    store: &Arc<FileStore>,
    out: &mut impl Write,
    currency: &'static Currency,
) -> Result<(), CommandError> {
    let customers = CustomerStore::new(Arc::clone(store));
    let customer = resolve_customer(&args.customer, customers.load())?;
    let mut orders = OrderLedger::open(Arc::clone(store));

    let product = Product {
        id: ProductId::new(args.id),
        name: args.product,
        price: args.price,
        stock: args.stock,
        color_options: args.color.iter().cloned().collect(),
    };

    let order = submit_product_order(
        &mut orders,
        &customers,
        &product,
        args.quantity,
        args.color.as_deref(),
        customer,
    )?;

    writeln!(
        out,
        "Placed order {} for {}",
        order.id(),
        format_price(order.total(), currency).map_err(ReceiptError::from)?
    )?;

    Ok(())
}

fn run_orders(
    command: OrdersCommand,
    store: Arc<FileStore>,
    out: &mut impl Write,
    currency: &'static Currency,
) -> Result<(), CommandError> {
    let mut orders = OrderLedger::open(store);

    match command {
        OrdersCommand::Show { id: None } => write_orders(out, orders.orders(), currency)?,
        OrdersCommand::Show { id: Some(id) } => {
            let id = OrderId::from(id);
            let order = orders
                .find(&id)
                .ok_or_else(|| CommandError::OrderNotFound(id.clone()))?;

            write_order(out, order, currency)?;
        }
        OrdersCommand::Status { id, status } => {
            let id = OrderId::from(id);

            if orders.find(&id).is_none() {
                return Err(CommandError::OrderNotFound(id));
            }

            orders.update_status(&id, status);

            writeln!(out, "Order {id} is now {status}")?;
        }
        OrdersCommand::Clear => {
            orders.clear_all();

            writeln!(out, "Order history cleared")?;
        }
    }

    Ok(())
}

fn run_customer(
    command: &CustomerCommand,
    store: Arc<FileStore>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let customers = CustomerStore::new(store);

    match command {
        CustomerCommand::Show => match customers.load() {
            Some(info) => writeln!(out, "{}\n{}\n{}", info.name, info.phone, info.address)?,
            None => writeln!(out, "No saved customer details")?,
        },
        CustomerCommand::Forget => {
            customers.clear();

            writeln!(out, "Saved customer details forgotten")?;
        }
    }

    Ok(())
}

fn resolve_customer(
    args: &CustomerArgs,
    saved: Option<CustomerInfo>,
) -> Result<CustomerInfo, CommandError> {
    let pick = |given: &Option<String>, fallback: Option<&String>, field: &'static str| {
        given
            .clone()
            .or_else(|| fallback.cloned())
            .ok_or(CommandError::MissingCustomerField(field))
    };

    Ok(CustomerInfo::new(
        pick(&args.name, saved.as_ref().map(|info| &info.name), "name")?,
        pick(&args.phone, saved.as_ref().map(|info| &info.phone), "phone")?,
        pick(
            &args.address,
            saved.as_ref().map(|info| &info.address),
            "address",
        )?,
    ))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tempfile::tempdir;
    use testresult::TestResult;

    use storefront_ledger::{
        orders::LocalOrder,
        storage::{CART_KEY, CUSTOMER_INFO_KEY, ORDERS_KEY, Storage},
    };

    use super::*;

    fn is_blank<S: Storage>(storage: &S) -> bool {
        [CART_KEY, ORDERS_KEY, CUSTOMER_INFO_KEY]
            .iter()
            .all(|key| matches!(storage.get(key), Ok(None)))
    }

    fn config(path: &std::path::Path, args: &[&str]) -> Result<Config, clap::Error> {
        let store = path.to_string_lossy().into_owned();
        let mut argv = vec!["storefront", "--store", store.as_str()];
        argv.extend_from_slice(args);

        Config::try_parse_from(argv)
    }

    #[test]
    fn resolve_customer_prefers_given_details() -> TestResult {
        let args = CustomerArgs {
            name: Some("B".to_string()),
            phone: None,
            address: None,
        };
        let saved = CustomerInfo::new("A", "+15551234567", "1 Main St");

        let customer = resolve_customer(&args, Some(saved))?;

        assert_eq!(customer, CustomerInfo::new("B", "+15551234567", "1 Main St"));

        Ok(())
    }

    #[test]
    fn resolve_customer_requires_missing_fields() {
        let args = CustomerArgs {
            name: Some("B".to_string()),
            phone: None,
            address: Some("1 Main St".to_string()),
        };

        let result = resolve_customer(&args, None);

        assert!(
            matches!(result, Err(CommandError::MissingCustomerField("phone"))),
            "expected MissingCustomerField, got {result:?}"
        );
    }

    #[test]
    fn cart_add_then_checkout_through_the_cli() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("store.json");

        run(config(
            &path,
            &[
                "cart", "add", "--id", "5", "--name", "Widget", "--price", "10.00", "--stock",
                "10", "--quantity", "2",
            ],
        )?)?;

        run(config(
            &path,
            &[
                "checkout",
                "--customer",
                "A",
                "--phone",
                "+15551234567",
                "--address",
                "1 Main St",
                "--remember",
            ],
        )?)?;

        let store = FileStore::open(&path);
        let orders = OrderLedger::open(&store);

        assert_eq!(orders.len(), 1);
        assert_eq!(
            orders.orders().first().map(LocalOrder::total),
            Some(Decimal::new(2000, 2))
        );
        assert!(CartLedger::open(&store).is_empty());
        assert!(CustomerStore::new(&store).exists());

        Ok(())
    }

    #[test]
    fn status_of_unknown_order_is_an_error() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("store.json");

        let result = run(config(&path, &["orders", "status", "ORD-1-X", "confirmed"])?);

        assert!(
            matches!(result, Err(CommandError::OrderNotFound(_))),
            "expected OrderNotFound, got {result:?}"
        );
        assert!(is_blank(&FileStore::open(&path)));

        Ok(())
    }

    #[test]
    fn buy_places_order_and_remembers_customer() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("store.json");

        run(config(
            &path,
            &[
                "buy",
                "--id",
                "7",
                "--product",
                "Lamp",
                "--price",
                "22.50",
                "--stock",
                "3",
                "--quantity",
                "2",
                "--customer",
                "A",
                "--phone",
                "+15551234567",
                "--address",
                "1 Main St",
            ],
        )?)?;

        let store = FileStore::open(&path);
        let orders = OrderLedger::open(&store);

        assert_eq!(
            orders.orders().first().map(LocalOrder::total),
            Some(Decimal::new(4500, 2))
        );
        assert!(CartLedger::open(&store).is_empty());
        assert_eq!(
            CustomerStore::new(&store).load(),
            Some(CustomerInfo::new("A", "+15551234567", "1 Main St"))
        );

        run(config(
            &path,
            &[
                "buy", "--id", "7", "--product", "Lamp", "--price", "22.50", "--stock", "3",
            ],
        )?)?;

        assert_eq!(OrderLedger::open(&store).len(), 2);

        Ok(())
    }
}
