use std::{error::Error, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use rusqlite::Connection;

use spendiq_rs::{
    CoordinatorConfig, Error as SpendiqError, Location, Status, Transaction,
    TransactionCoordinator, TransactionType, format_amount, setup_logging,
    stores::{SQLiteTransactionStore, sqlite::create_transaction_store},
};

/// Record and review transactions stored in a SpendiQ database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database.
    #[arg(long)]
    db_path: String,

    /// When fetches overlap, only apply the response of the most recent one.
    #[arg(long)]
    discard_stale_fetches: bool,

    /// Also append debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print transactions as JSON, one per line.
    List {
        /// Only list the transactions of this account.
        #[arg(long)]
        account: Option<String>,
    },
    /// Add a transaction and print the account's transactions.
    Add {
        /// The account the transaction belongs to.
        #[arg(long)]
        account: String,

        /// What the transaction was for.
        #[arg(long)]
        name: String,

        /// The amount in the minor currency unit.
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
        amount: i64,

        /// Either "Income" or "Expense".
        #[arg(long = "type", default_value = "Expense")]
        transaction_type: String,

        /// Latitude of where the transaction happened.
        #[arg(long, requires = "longitude", allow_negative_numbers = true)]
        latitude: Option<f64>,

        /// Longitude of where the transaction happened.
        #[arg(long, requires = "latitude", allow_negative_numbers = true)]
        longitude: Option<f64>,
    },
    /// Delete a transaction and print the account's remaining transactions.
    Delete {
        /// The account the transaction belongs to.
        #[arg(long)]
        account: String,

        /// The ID of the transaction.
        #[arg(long)]
        id: String,
    },
    /// Print total income, expenses and the difference between them.
    Summary {
        /// Only total the transactions of this account.
        #[arg(long)]
        account: Option<String>,
    },
}

type Coordinator = TransactionCoordinator<SQLiteTransactionStore>;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(args.log_file.as_deref())?;

    let connection = Connection::open(&args.db_path)?;
    let store = create_transaction_store(connection)?;
    let config = if args.discard_stale_fetches {
        CoordinatorConfig::discard_stale_fetches()
    } else {
        CoordinatorConfig::default()
    };
    let coordinator = TransactionCoordinator::with_config(store, config);

    match args.command {
        Command::List { account } => {
            fetch(&coordinator, account.as_deref());
            if !settle(&coordinator).await {
                return Ok(ExitCode::FAILURE);
            }
            print_transactions(&coordinator)?;
        }
        Command::Add {
            account,
            name,
            amount,
            transaction_type,
            latitude,
            longitude,
        } => {
            let location = latitude
                .zip(longitude)
                .map(|(latitude, longitude)| Location {
                    latitude,
                    longitude,
                });
            let transaction = Transaction::build(&account, &name, amount)
                .transaction_type(TransactionType::from(transaction_type))
                .location(location)
                .finalize();

            coordinator.add_transaction_with_account_check(transaction);
            if !settle(&coordinator).await {
                return Ok(ExitCode::FAILURE);
            }
            print_transactions(&coordinator)?;
        }
        Command::Delete { account, id } => {
            coordinator.get_transaction(&account, &id);
            if !settle(&coordinator).await {
                return Ok(ExitCode::FAILURE);
            }
            let Some(transaction) = coordinator.selected_transaction().get() else {
                eprintln!("Transaction {id} not found in account {account}");
                return Ok(ExitCode::FAILURE);
            };

            coordinator.delete_transaction(&account, transaction);
            if !settle(&coordinator).await {
                return Ok(ExitCode::FAILURE);
            }
            print_transactions(&coordinator)?;
        }
        Command::Summary { account } => {
            fetch(&coordinator, account.as_deref());
            if !settle(&coordinator).await {
                return Ok(ExitCode::FAILURE);
            }

            let totals = coordinator.get_income_and_expenses();
            println!("Income:   {}", format_amount(totals.income));
            println!("Expenses: {}", format_amount(totals.expenses));
            println!("Net:      {}", format_amount(totals.net()));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn fetch(coordinator: &Coordinator, account: Option<&str>) {
    match account {
        Some(account) => coordinator.fetch_transactions(account),
        None => coordinator.fetch_all_transactions(),
    }
}

/// Wait for all operations to finish, returning `false` and printing the
/// message if the final status is an error.
async fn settle(coordinator: &Coordinator) -> bool {
    coordinator.settle().await;

    match coordinator.status().get() {
        Status::Error(message) => {
            eprintln!("{message}");
            false
        }
        _ => true,
    }
}

fn print_transactions(coordinator: &Coordinator) -> Result<(), SpendiqError> {
    for transaction in coordinator.transactions().get() {
        let line = serde_json::to_string(&transaction)
            .map_err(|error| SpendiqError::JSONSerializationError(error.to_string()))?;
        println!("{line}");
    }

    Ok(())
}
