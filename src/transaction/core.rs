//! Defines the core data models for transactions.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// A transaction is identified by its `id` together with its `account_id`.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction, empty until the store has assigned one.
    #[serde(default)]
    pub id: String,
    /// The ID of the account the transaction belongs to.
    pub account_id: String,
    /// A text description of what the transaction was for.
    pub transaction_name: String,
    /// The amount of money in the minor currency unit.
    ///
    /// Whether the money was spent or earned is decided by
    /// [Transaction::transaction_type], not by the sign of the amount.
    pub amount: i64,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
    /// Whether the transaction is income, an expense, or something else.
    pub transaction_type: TransactionType,
    /// Where the transaction happened, if location capture was enabled.
    #[serde(default)]
    pub location: Option<Location>,
    /// The transaction was detected automatically rather than entered by hand.
    #[serde(default)]
    pub automatic: bool,
    /// The amount was flagged as unusual.
    #[serde(default)]
    pub amount_anomaly: bool,
    /// The location was flagged as unusual.
    #[serde(default)]
    pub location_anomaly: bool,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(account_id: &str, transaction_name: &str, amount: i64) -> TransactionBuilder {
        TransactionBuilder {
            id: String::new(),
            account_id: account_id.to_owned(),
            transaction_name: transaction_name.to_owned(),
            amount,
            date_time: OffsetDateTime::now_utc(),
            transaction_type: TransactionType::Expense,
            location: None,
            automatic: false,
            amount_anomaly: false,
            location_anomaly: false,
        }
    }
}

/// How a transaction is treated when totalling income and expenses.
///
/// Stored as the raw strings `"Income"` and `"Expense"`. Any other string is
/// kept as-is in [TransactionType::Other] and counts as neither.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
    /// Any other raw type value.
    Other(String),
}

impl TransactionType {
    /// The raw string stored for this type.
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
            TransactionType::Other(raw) => raw,
        }
    }
}

impl From<String> for TransactionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Income" => TransactionType::Income,
            "Expense" => TransactionType::Expense,
            _ => TransactionType::Other(value),
        }
    }
}

impl From<&str> for TransactionType {
    fn from(value: &str) -> Self {
        value.to_owned().into()
    }
}

impl From<TransactionType> for String {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Degrees north of the equator.
    pub latitude: f64,
    /// Degrees east of the prime meridian.
    pub longitude: f64,
}

/// A builder for creating [Transaction] instances.
///
/// Manually entered transactions start out with the current time, the
/// `Expense` type, no location and every anomaly flag cleared. Call
/// `finalize()` to create the actual [Transaction].
///
/// # Examples
///
/// ```
/// use spendiq_rs::{Location, Transaction, TransactionType};
///
/// let transaction = Transaction::build("savings", "Salary", 2_500_000)
///     .transaction_type(TransactionType::Income)
///     .location(Some(Location { latitude: 4.6, longitude: -74.08 }))
///     .finalize();
///
/// assert_eq!(transaction.id, "");
/// assert_eq!(transaction.transaction_type, TransactionType::Income);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    id: String,
    account_id: String,
    transaction_name: String,
    amount: i64,
    date_time: OffsetDateTime,
    transaction_type: TransactionType,
    location: Option<Location>,
    automatic: bool,
    amount_anomaly: bool,
    location_anomaly: bool,
}

impl TransactionBuilder {
    /// Set the ID of the transaction.
    ///
    /// Only stores should need this, new transactions have their ID assigned
    /// when they are added.
    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_owned();
        self
    }

    /// Set when the transaction happened.
    pub fn date_time(mut self, date_time: OffsetDateTime) -> Self {
        self.date_time = date_time;
        self
    }

    /// Set whether the transaction is income or an expense.
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    /// Set where the transaction happened.
    pub fn location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    /// Mark the transaction as automatically detected.
    pub fn automatic(mut self, automatic: bool) -> Self {
        self.automatic = automatic;
        self
    }

    /// Flag the amount as unusual.
    pub fn amount_anomaly(mut self, amount_anomaly: bool) -> Self {
        self.amount_anomaly = amount_anomaly;
        self
    }

    /// Flag the location as unusual.
    pub fn location_anomaly(mut self, location_anomaly: bool) -> Self {
        self.location_anomaly = location_anomaly;
        self
    }

    /// Create the [Transaction].
    pub fn finalize(self) -> Transaction {
        Transaction {
            id: self.id,
            account_id: self.account_id,
            transaction_name: self.transaction_name,
            amount: self.amount,
            date_time: self.date_time,
            transaction_type: self.transaction_type,
            location: self.location,
            automatic: self.automatic,
            amount_anomaly: self.amount_anomaly,
            location_anomaly: self.location_anomaly,
        }
    }
}
