//! Alipay Demo CLI
//!
//! Command-line interface for trying the gateway client against the sandbox
//! (or production) gateway.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "alipay-demo")]
#[command(about = "Alipay Demo CLI - Sign, send and verify gateway calls", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config file (otherwise ALIPAY_* environment variables are used)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a signed checkout URL or app order string (no network)
    Checkout {
        #[command(subcommand)]
        kind: CheckoutKind,
    },

    /// Query a trade
    Query {
        #[command(flatten)]
        trade: TradeRef,
    },

    /// Refund (part of) a paid trade
    Refund {
        /// Merchant order number
        out_trade_no: String,

        /// Amount to refund, in yuan
        amount: String,

        /// Refund request number; reuse it when retrying
        #[arg(long)]
        request_no: Option<String>,

        /// Reason shown to the buyer
        #[arg(long)]
        reason: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Check the outcome of a refund request
    RefundQuery {
        /// Merchant order number
        out_trade_no: String,

        /// Refund request number (defaults to the order number)
        #[arg(long)]
        request_no: Option<String>,
    },

    /// Close an unpaid trade
    Close {
        #[command(flatten)]
        trade: TradeRef,
    },

    /// Cancel a trade (refunds it if already paid)
    Cancel {
        #[command(flatten)]
        trade: TradeRef,
    },

    /// Create a trade and show its QR code
    Precreate {
        #[command(flatten)]
        order: OrderArgs,
    },

    /// Verify a notification body read from a file or stdin
    VerifyNotify {
        /// File holding the form-encoded body; stdin when omitted
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CheckoutKind {
    /// Desktop web checkout URL
    Page {
        #[command(flatten)]
        order: OrderArgs,

        /// Where the browser returns after paying
        #[arg(long)]
        return_url: Option<String>,
    },

    /// Mobile web checkout URL
    Wap {
        #[command(flatten)]
        order: OrderArgs,

        /// Where the browser returns after paying
        #[arg(long)]
        return_url: Option<String>,
    },

    /// Order string for the mobile SDK
    App {
        #[command(flatten)]
        order: OrderArgs,
    },
}

/// A trade, by merchant order number or gateway trade number.
#[derive(Args, Debug)]
pub struct TradeRef {
    /// Merchant order number
    #[arg(required_unless_present = "trade_no")]
    pub out_trade_no: Option<String>,

    /// Gateway trade number
    #[arg(long, conflicts_with = "out_trade_no")]
    pub trade_no: Option<String>,
}

/// A new order.
#[derive(Args, Debug)]
pub struct OrderArgs {
    /// Total amount, in yuan (e.g. 0.01)
    #[arg(short, long)]
    pub amount: String,

    /// Order title
    #[arg(short, long)]
    pub subject: String,

    /// Merchant order number (generated when omitted)
    #[arg(long)]
    pub out_trade_no: Option<String>,

    /// Latest payment time, e.g. 15m, 2h, 1d
    #[arg(long, default_value = "15m")]
    pub timeout: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("alipay_demo_cli=debug,alipay_lib=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("alipay_demo_cli=info,alipay_lib=warn")
            .init();
    }

    let config = cli.config.as_deref();

    // Dispatch commands
    match cli.command {
        Commands::Checkout { kind } => match kind {
            CheckoutKind::Page { order, return_url } => {
                commands::checkout::page(config, &order, return_url, cli.verbose)?;
            }
            CheckoutKind::Wap { order, return_url } => {
                commands::checkout::wap(config, &order, return_url, cli.verbose)?;
            }
            CheckoutKind::App { order } => {
                commands::checkout::app(config, &order, cli.verbose)?;
            }
        },
        Commands::Query { trade } => {
            commands::query::run(config, &trade, cli.verbose).await?;
        }
        Commands::Refund {
            out_trade_no,
            amount,
            request_no,
            reason,
            yes,
        } => {
            commands::refund::refund(
                config,
                &out_trade_no,
                &amount,
                request_no,
                reason,
                yes,
                cli.verbose,
            )
            .await?;
        }
        Commands::RefundQuery {
            out_trade_no,
            request_no,
        } => {
            commands::refund::query(config, &out_trade_no, request_no, cli.verbose).await?;
        }
        Commands::Close { trade } => {
            commands::close::close(config, &trade, cli.verbose).await?;
        }
        Commands::Cancel { trade } => {
            commands::close::cancel(config, &trade, cli.verbose).await?;
        }
        Commands::Precreate { order } => {
            commands::precreate::run(config, &order, cli.verbose).await?;
        }
        Commands::VerifyNotify { file } => {
            commands::verify_notify::run(config, file.as_deref(), cli.verbose)?;
        }
    }

    Ok(())
}
