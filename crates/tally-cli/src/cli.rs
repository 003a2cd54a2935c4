//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track income, outcome and targets
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TALLY_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Account to act as for per-user commands
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Manage users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Manage transactions (list, add, delete)
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Set month targets and save-money targets
    Targets {
        #[command(subcommand)]
        action: TargetsAction,
    },

    /// Print chart data as JSON
    Chart {
        #[command(subcommand)]
        chart: ChartType,
    },

    /// Write a monthly or yearly ledger report
    Report {
        /// Report year
        #[arg(long)]
        year: i32,

        /// Report month (1-12); omit for the whole year
        #[arg(long)]
        month: Option<u32>,

        /// Output format: csv or json
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output file or directory (defaults to tally-YYYY[-MM].csv in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// Requests without an API key run as --dev-user.
        #[arg(long)]
        no_auth: bool,

        /// Account used for unauthenticated requests when --no-auth is set
        #[arg(long)]
        dev_user: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Register a user with an API key
    Add {
        /// Unique account name
        #[arg(long)]
        account: String,

        /// Display name (defaults to the account)
        #[arg(long)]
        name: Option<String>,

        /// Contact email
        #[arg(long)]
        email: Option<String>,

        /// Bearer key for the API (at least 16 characters)
        #[arg(long)]
        api_key: String,
    },

    /// List users
    List,
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories
    List {
        /// Only categories linked to at least one transaction
        #[arg(long)]
        assigned_only: bool,
    },

    /// Add a category
    Add {
        /// Category name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions (defaults to the current month)
    List {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Only this kind: income or outcome
        #[arg(long)]
        kind: Option<String>,

        /// Only transactions in these category ids
        #[arg(long = "category")]
        categories: Vec<i64>,
    },

    /// Record a transaction
    Add {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// income or outcome
        #[arg(long)]
        kind: String,

        /// Amount in minor units (non-negative)
        #[arg(long)]
        amount: i64,

        /// Category id (repeatable)
        #[arg(long = "category")]
        categories: Vec<i64>,

        /// Short title
        #[arg(long, default_value = "")]
        title: String,

        /// Longer description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum TargetsAction {
    /// Set income/outcome goals for a month
    Month {
        #[arg(long)]
        year: i32,

        #[arg(long)]
        month: u32,

        /// Income goal in minor units
        #[arg(long, default_value = "0")]
        income: i64,

        /// Outcome goal in minor units
        #[arg(long, default_value = "0")]
        outcome: i64,
    },

    /// Cap the outcome of one category
    Save {
        /// Category ID
        #[arg(long)]
        category: i64,

        /// Target amount in minor units
        #[arg(long)]
        amount: i64,

        /// Window start (YYYY-MM-DD); open when omitted
        #[arg(long)]
        from: Option<String>,

        /// Window end (YYYY-MM-DD); open when omitted
        #[arg(long)]
        end: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ChartType {
    /// Daily income and outcome over a range
    Range {
        #[arg(long)]
        from: String,

        #[arg(long)]
        end: String,
    },

    /// Outcome share per category
    Categories {
        #[arg(long)]
        from: String,

        #[arg(long)]
        end: String,
    },

    /// Range totals against the preceding range
    Compare {
        #[arg(long)]
        from: String,

        #[arg(long)]
        end: String,
    },

    /// Month target progress
    Target {
        #[arg(long)]
        year: i32,

        #[arg(long)]
        month: u32,
    },

    /// Save-money target progress for a category
    Save {
        /// Category ID
        #[arg(long)]
        category: i64,
    },
}
