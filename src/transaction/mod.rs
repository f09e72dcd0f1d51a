//! Transaction management for the personal finance app.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The observable state shown to the user
//! - The coordinator that keeps that state in sync with a store
//! - Income and expense totals

mod aggregation;
mod coordinator;
mod core;
mod state;

pub use aggregation::{IncomeAndExpenses, income_and_expenses};
pub use coordinator::{TransactionCoordinator, UNEXPECTED_ERROR_MESSAGE};
pub use self::core::{Location, Transaction, TransactionBuilder, TransactionType};
pub use state::{Projection, Status, Subscription, TransactionState};
