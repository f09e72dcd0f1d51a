//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{Connection, Row};
use time::UtcOffset;
use uuid::Uuid;

use crate::{
    Error, StoreError,
    stores::TransactionStore,
    transaction::{Location, Transaction, TransactionType},
};

const SELECT_COLUMNS: &str = "SELECT id, account_id, transaction_name, amount, date_time, \
     transaction_type, latitude, longitude, automatic, amount_anomaly, location_anomaly \
     FROM \"transaction\"";

/// Stores transactions in a SQLite database.
///
/// Lists are returned newest first, transactions with the same date-time are
/// kept in the order they were added.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The transaction table must already exist, see [create_transaction_table].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::StoreLockError)
    }

    fn query_transactions(
        connection: &Connection,
        where_clause: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Transaction>, Error> {
        let query = format!("{SELECT_COLUMNS} {where_clause} ORDER BY date_time DESC, rowid ASC");

        connection
            .prepare(&query)?
            .query_map(params, map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }
}

#[async_trait]
impl TransactionStore for SQLiteTransactionStore {
    /// Retrieve the transactions of the account `account_key`.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    async fn get_transactions(&self, account_key: &str) -> Result<Vec<Transaction>, StoreError> {
        let connection = self.lock()?;

        Ok(Self::query_transactions(
            &connection,
            "WHERE account_id = ?1",
            (account_key,),
        )?)
    }

    /// Retrieve a transaction by its account and `transaction_id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if the pair does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    async fn get_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction, StoreError> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(&format!(
                "{SELECT_COLUMNS} WHERE account_id = ?1 AND id = ?2"
            ))
            .map_err(Error::from)?
            .query_row((account_id, transaction_id), map_transaction_row)
            .map_err(Error::from)?;

        Ok(transaction)
    }

    /// Insert a transaction with a newly generated ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyAccountId] if the transaction has no account,
    /// - or [Error::SqlError] if there is some SQL error.
    async fn add_transaction(&self, transaction: Transaction) -> Result<(), StoreError> {
        if transaction.account_id.is_empty() {
            return Err(Error::EmptyAccountId.into());
        }

        let id = Uuid::new_v4().to_string();
        let location = transaction.location;

        self.lock()?
            .execute(
                "INSERT INTO \"transaction\" (id, account_id, transaction_name, amount, date_time,
                    transaction_type, latitude, longitude, automatic, amount_anomaly, location_anomaly)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                rusqlite::params![
                    id,
                    transaction.account_id,
                    transaction.transaction_name,
                    transaction.amount,
                    transaction.date_time.to_offset(UtcOffset::UTC),
                    transaction.transaction_type.as_str(),
                    location.map(|location| location.latitude),
                    location.map(|location| location.longitude),
                    transaction.automatic,
                    transaction.amount_anomaly,
                    transaction.location_anomaly,
                ],
            )
            .map_err(Error::from)?;

        Ok(())
    }

    /// Overwrite `old` with the fields of `new`, keeping the ID of `old`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyAccountId] if `new` has no account,
    /// - [Error::NotFound] if `old` is not in the account `account_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    async fn update_transaction(
        &self,
        account_id: &str,
        old: &Transaction,
        new: Transaction,
    ) -> Result<(), StoreError> {
        if new.account_id.is_empty() {
            return Err(Error::EmptyAccountId.into());
        }

        let location = new.location;

        let rows_affected = self
            .lock()?
            .execute(
                "UPDATE \"transaction\"
                 SET account_id = ?1, transaction_name = ?2, amount = ?3, date_time = ?4,
                    transaction_type = ?5, latitude = ?6, longitude = ?7, automatic = ?8,
                    amount_anomaly = ?9, location_anomaly = ?10
                 WHERE account_id = ?11 AND id = ?12",
                rusqlite::params![
                    new.account_id,
                    new.transaction_name,
                    new.amount,
                    new.date_time.to_offset(UtcOffset::UTC),
                    new.transaction_type.as_str(),
                    location.map(|location| location.latitude),
                    location.map(|location| location.longitude),
                    new.automatic,
                    new.amount_anomaly,
                    new.location_anomaly,
                    account_id,
                    old.id,
                ],
            )
            .map_err(Error::from)?;

        if rows_affected == 0 {
            return Err(Error::NotFound.into());
        }

        Ok(())
    }

    /// Delete `transaction` from the account `account_id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if the transaction is not in the account,
    /// - or [Error::SqlError] if there is some other SQL error.
    async fn delete_transaction(
        &self,
        account_id: &str,
        transaction: &Transaction,
    ) -> Result<(), StoreError> {
        let rows_affected = self
            .lock()?
            .execute(
                "DELETE FROM \"transaction\" WHERE account_id = ?1 AND id = ?2",
                (account_id, &transaction.id),
            )
            .map_err(Error::from)?;

        if rows_affected == 0 {
            return Err(Error::NotFound.into());
        }

        Ok(())
    }

    /// Retrieve the transactions of every account.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    async fn get_all_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let connection = self.lock()?;

        Ok(Self::query_transactions(&connection, "", [])?)
    }
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id TEXT PRIMARY KEY,
                account_id TEXT NOT NULL,
                transaction_name TEXT NOT NULL,
                amount INTEGER NOT NULL,
                date_time TEXT NOT NULL,
                transaction_type TEXT NOT NULL,
                latitude REAL,
                longitude REAL,
                automatic INTEGER NOT NULL DEFAULT 0,
                amount_anomaly INTEGER NOT NULL DEFAULT 0,
                location_anomaly INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account_id ON \"transaction\"(account_id)",
        (),
    )?;

    Ok(())
}

/// Map a database row to a transaction.
///
/// Expects the columns in the order of [SELECT_COLUMNS].
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let latitude: Option<f64> = row.get(6)?;
    let longitude: Option<f64> = row.get(7)?;
    let location = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(Location {
            latitude,
            longitude,
        }),
        _ => None,
    };
    let transaction_type: String = row.get(5)?;

    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        transaction_name: row.get(2)?,
        amount: row.get(3)?,
        date_time: row.get(4)?,
        transaction_type: TransactionType::from(transaction_type),
        location,
        automatic: row.get(8)?,
        amount_anomaly: row.get(9)?,
        location_anomaly: row.get(10)?,
    })
}
