//! Contains the store trait and implementations for persisting
//! [transactions](crate::Transaction).

mod memory;
mod transaction;

pub mod sqlite;

pub use memory::MemoryTransactionStore;
pub use sqlite::SQLiteTransactionStore;
pub use transaction::TransactionStore;
