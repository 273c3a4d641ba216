//! Storefront CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use rusty_money::iso::{self, Currency};

use crate::commands::Command;

/// Storefront cart and order ledger
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront cart and order ledger", long_about = None)]
pub(crate) struct Config {
    /// Storage settings.
    #[command(flatten)]
    pub(crate) store: StoreConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    /// Command to run.
    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Storage settings.
#[derive(Debug, Args)]
pub(crate) struct StoreConfig {
    /// Path of the JSON document holding the cart, orders and saved customer
    #[arg(
        short,
        long = "store",
        env = "STOREFRONT_STORE",
        default_value = "storefront.json",
        global = true
    )]
    pub(crate) path: PathBuf,

    /// Currency used to display prices
    #[arg(
        long,
        env = "STOREFRONT_CURRENCY",
        value_enum,
        default_value_t = CurrencyCode::Tnd,
        global = true
    )]
    pub(crate) currency: CurrencyCode,
}

/// Display currencies.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum CurrencyCode {
    /// Tunisian dinar
    Tnd,

    /// US dollar
    Usd,

    /// Euro
    Eur,

    /// Pound sterling
    Gbp,
}

impl CurrencyCode {
    pub(crate) fn currency(self) -> &'static Currency {
        match self {
            Self::Tnd => iso::TND,
            Self::Usd => iso::USD,
            Self::Eur => iso::EUR,
            Self::Gbp => iso::GBP,
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub(crate) log_format: LogFormat,
}
