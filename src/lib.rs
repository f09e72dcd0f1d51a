//! SpendiQ keeps track of the income and expenses recorded against your
//! accounts.
//!
//! This library provides the transaction core of the app: a coordinator that
//! runs operations against a [TransactionStore](stores::TransactionStore) and
//! publishes the results as observable state, and the income and expense
//! totals computed from that state.

#![warn(missing_docs)]

mod config;
mod error;
mod format;
mod logging;
mod session;
mod transaction;

pub mod stores;

#[cfg(test)]
mod test_utils;

pub use config::{CoordinatorConfig, FetchOrdering};
pub use error::{Error, StoreError};
pub use format::format_amount;
pub use logging::setup_logging;
pub use session::Session;
pub use transaction::{
    IncomeAndExpenses, Location, Projection, Status, Subscription, Transaction,
    TransactionBuilder, TransactionCoordinator, TransactionState, TransactionType,
    UNEXPECTED_ERROR_MESSAGE, income_and_expenses,
};
