//! Defines the transaction store trait.

use async_trait::async_trait;

use crate::{StoreError, transaction::Transaction};

/// Persists transactions on behalf of the [coordinator](crate::TransactionCoordinator).
///
/// Every operation resolves to exactly one outcome: the success value or a
/// [StoreError].
#[async_trait]
pub trait TransactionStore: Send + Sync + 'static {
    /// Retrieve the transactions of the account identified by `account_key`.
    async fn get_transactions(&self, account_key: &str) -> Result<Vec<Transaction>, StoreError>;

    /// Retrieve a single transaction.
    async fn get_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction, StoreError>;

    /// Add a new transaction to the store.
    ///
    /// Implementers assign the transaction's ID and ignore any ID it already
    /// has.
    async fn add_transaction(&self, transaction: Transaction) -> Result<(), StoreError>;

    /// Replace `old`, which belongs to `account_id`, with `new`.
    ///
    /// `new` may belong to a different account than `old`. The ID of `old` is
    /// kept.
    async fn update_transaction(
        &self,
        account_id: &str,
        old: &Transaction,
        new: Transaction,
    ) -> Result<(), StoreError>;

    /// Remove `transaction` from the account `account_id`.
    async fn delete_transaction(
        &self,
        account_id: &str,
        transaction: &Transaction,
    ) -> Result<(), StoreError>;

    /// Retrieve the transactions of every account.
    async fn get_all_transactions(&self) -> Result<Vec<Transaction>, StoreError>;
}
