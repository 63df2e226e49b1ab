//! shopcart - Command line host for the multi-tenant cart store.
//!
//! Commands:
//! - `shopcart add` - Add a product to an owner's cart
//! - `shopcart remove` - Remove a product line
//! - `shopcart update` - Set a line's quantity
//! - `shopcart clear` - Empty one cart, or all of them
//! - `shopcart show` / `shopcart totals` - Inspect a cart
//! - `shopcart login` / `shopcart logout` - Identity hooks
//! - `shopcart checkout` / `shopcart orders` - Place and list orders
//! - `shopcart config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    AddArgs, CheckoutArgs, ClearArgs, ConfigArgs, LoginArgs, LogoutArgs, OrdersArgs, RemoveArgs,
    UpdateArgs, ViewArgs,
};

/// shopcart - Manage per-user shopping carts
#[derive(Parser)]
#[command(name = "shopcart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a product to a cart
    Add(AddArgs),

    /// Remove a product from a cart
    Remove(RemoveArgs),

    /// Change the quantity of a cart line
    Update(UpdateArgs),

    /// Empty a cart
    Clear(ClearArgs),

    /// List the lines in a cart
    Show(ViewArgs),

    /// Print item count and subtotal
    Totals(ViewArgs),

    /// Log a user in and make them the default owner
    Login(LoginArgs),

    /// Log out and drop every stored cart line
    Logout(LogoutArgs),

    /// Pay for a cart and place the order
    Checkout(CheckoutArgs),

    /// List placed orders
    Orders(OrdersArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    logging::init(&ctx.config.logging, ctx.output.is_verbose());

    // Execute command
    let result = match cli.command {
        Commands::Add(args) => commands::cart::add(args, &ctx),
        Commands::Remove(args) => commands::cart::remove(args, &ctx),
        Commands::Update(args) => commands::cart::update(args, &ctx),
        Commands::Clear(args) => commands::cart::clear(args, &ctx),
        Commands::Show(args) => commands::cart::show(args, &ctx),
        Commands::Totals(args) => commands::cart::totals(args, &ctx),
        Commands::Login(args) => commands::session::login(args, &ctx),
        Commands::Logout(args) => commands::session::logout(args, &ctx),
        Commands::Checkout(args) => commands::checkout::run(args, &ctx),
        Commands::Orders(args) => commands::checkout::orders(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
