//! Contains the SQLite backed store and the function for preparing a
//! database for it.

mod transaction;

pub use transaction::{SQLiteTransactionStore, create_transaction_table};

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::Error;

/// Creates a [SQLiteTransactionStore] for `db_connection`.
///
/// This function will modify the database by adding the transaction table if
/// it does not exist yet.
///
/// # Errors
/// Returns an [Error::SqlError] if the table cannot be created.
pub fn create_transaction_store(db_connection: Connection) -> Result<SQLiteTransactionStore, Error> {
    create_transaction_table(&db_connection)?;

    Ok(SQLiteTransactionStore::new(Arc::new(Mutex::new(
        db_connection,
    ))))
}
