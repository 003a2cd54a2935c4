//! Tally CLI - Personal finance tracker
//!
//! Usage:
//!   tally init                                Initialize database
//!   tally users add --account A --api-key K   Register a user
//!   tally -u A transactions add ...           Record a transaction
//!   tally -u A report --year 2024 --month 3   Write a ledger CSV
//!   tally serve --port 3000                   Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let user = cli.user.as_deref();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                UsersAction::Add {
                    account,
                    name,
                    email,
                    api_key,
                } => commands::cmd_users_add(&db, &account, name, email, &api_key),
                UsersAction::List => commands::cmd_users_list(&db),
            }
        }
        Commands::Categories { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let owner = commands::resolve_owner(&db, user)?;
            match action {
                None => commands::cmd_categories_list(&db, owner, false),
                Some(CategoriesAction::List { assigned_only }) => {
                    commands::cmd_categories_list(&db, owner, assigned_only)
                }
                Some(CategoriesAction::Add { name }) => {
                    commands::cmd_categories_add(&db, owner, &name)
                }
            }
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let owner = commands::resolve_owner(&db, user)?;
            match action {
                None => commands::cmd_transactions_list(&db, owner, None, None, None, Vec::new()),
                Some(TransactionsAction::List {
                    from,
                    end,
                    kind,
                    categories,
                }) => commands::cmd_transactions_list(
                    &db,
                    owner,
                    from.as_deref(),
                    end.as_deref(),
                    kind.as_deref(),
                    categories,
                ),
                Some(TransactionsAction::Add {
                    date,
                    kind,
                    amount,
                    categories,
                    title,
                    description,
                }) => commands::cmd_transactions_add(
                    &db,
                    owner,
                    &date,
                    &kind,
                    amount,
                    categories,
                    title,
                    description,
                ),
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&db, owner, id)
                }
            }
        }
        Commands::Targets { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let owner = commands::resolve_owner(&db, user)?;
            match action {
                TargetsAction::Month {
                    year,
                    month,
                    income,
                    outcome,
                } => commands::cmd_targets_month(&db, owner, year, month, income, outcome),
                TargetsAction::Save {
                    category,
                    amount,
                    from,
                    end,
                } => commands::cmd_targets_save(
                    &db,
                    owner,
                    category,
                    amount,
                    from.as_deref(),
                    end.as_deref(),
                ),
            }
        }
        Commands::Chart { chart } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let owner = commands::resolve_owner(&db, user)?;
            match chart {
                ChartType::Range { from, end } => {
                    commands::cmd_chart_range(&db, owner, &from, &end)
                }
                ChartType::Categories { from, end } => {
                    commands::cmd_chart_categories(&db, owner, &from, &end)
                }
                ChartType::Compare { from, end } => {
                    commands::cmd_chart_compare(&db, owner, &from, &end)
                }
                ChartType::Target { year, month } => {
                    commands::cmd_chart_target(&db, owner, year, month)
                }
                ChartType::Save { category } => commands::cmd_chart_save(&db, owner, category),
            }
        }
        Commands::Report {
            year,
            month,
            format,
            output,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let owner = commands::resolve_owner(&db, user)?;
            commands::cmd_report(&db, owner, year, month, &format, output.as_deref()).map(|_| ())
        }
        Commands::Serve {
            port,
            host,
            no_auth,
            dev_user,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                dev_user.as_deref(),
                cli.no_encrypt,
            )
            .await
        }
    }
}
