//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod session;

use clap::{Args, Subcommand};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    pub product_id: String,

    /// Unit price, e.g. 9.99.
    #[arg(short, long)]
    pub price: String,

    /// Product name shown in the cart.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Number of units to add.
    #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
    pub quantity: i64,

    /// Units in stock; the quantity is clamped to it.
    #[arg(long)]
    pub stock: Option<i64>,

    /// Product category.
    #[arg(long)]
    pub category: Option<String>,

    /// Product image URL.
    #[arg(long)]
    pub image: Option<String>,

    /// Owner (default: the logged-in user).
    #[arg(short, long)]
    pub owner: Option<String>,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Product ID.
    pub product_id: String,

    /// Owner (default: the logged-in user).
    #[arg(short, long)]
    pub owner: Option<String>,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Product ID.
    pub product_id: String,

    /// New quantity; zero or less removes the line.
    #[arg(allow_negative_numbers = true)]
    pub quantity: i64,

    /// Units in stock; the quantity is clamped to it.
    #[arg(long)]
    pub stock: Option<i64>,

    /// Owner (default: the logged-in user).
    #[arg(short, long)]
    pub owner: Option<String>,
}

/// Arguments for the clear command.
#[derive(Args)]
pub struct ClearArgs {
    /// Clear every owner's cart.
    #[arg(long, conflicts_with = "owner")]
    pub all: bool,

    /// Owner (default: the logged-in user).
    #[arg(short, long)]
    pub owner: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the show and totals commands.
#[derive(Args)]
pub struct ViewArgs {
    /// Owner (default: the logged-in user).
    #[arg(short, long)]
    pub owner: Option<String>,
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Owner ID of the user logging in.
    pub owner: String,
}

/// Arguments for the logout command.
#[derive(Args)]
pub struct LogoutArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Street address.
    #[arg(long, default_value = "")]
    pub address: String,

    /// City.
    #[arg(long, default_value = "")]
    pub city: String,

    /// Postal code.
    #[arg(long, default_value = "")]
    pub postal_code: String,

    /// Country.
    #[arg(long, default_value = "")]
    pub country: String,

    /// Reference of the confirmed payment.
    #[arg(long)]
    pub payment_ref: String,

    /// Owner (default: the logged-in user).
    #[arg(short, long)]
    pub owner: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    /// Owner (default: the logged-in user).
    #[arg(short, long)]
    pub owner: Option<String>,

    /// Show only the last N orders.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
