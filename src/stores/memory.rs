//! Implements an in-memory transaction store.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{Error, StoreError, stores::TransactionStore, transaction::Transaction};

/// Keeps transactions in memory, in the order they were added.
///
/// Clones share the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransactionStore {
    transactions: Arc<Mutex<Vec<Transaction>>>,
}

impl MemoryTransactionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `transactions` as they are, IDs included.
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: Arc::new(Mutex::new(transactions)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Transaction>>, Error> {
        self.transactions.lock().map_err(|_| Error::StoreLockError)
    }

    fn position(
        transactions: &[Transaction],
        account_id: &str,
        transaction_id: &str,
    ) -> Result<usize, Error> {
        transactions
            .iter()
            .position(|transaction| {
                transaction.account_id == account_id && transaction.id == transaction_id
            })
            .ok_or(Error::NotFound)
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn get_transactions(&self, account_key: &str) -> Result<Vec<Transaction>, StoreError> {
        let transactions = self.lock()?;

        Ok(transactions
            .iter()
            .filter(|transaction| transaction.account_id == account_key)
            .cloned()
            .collect())
    }

    async fn get_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction, StoreError> {
        let transactions = self.lock()?;
        let index = Self::position(&transactions, account_id, transaction_id)?;

        Ok(transactions[index].clone())
    }

    async fn add_transaction(&self, mut transaction: Transaction) -> Result<(), StoreError> {
        if transaction.account_id.is_empty() {
            return Err(Error::EmptyAccountId.into());
        }

        transaction.id = Uuid::new_v4().to_string();
        self.lock()?.push(transaction);

        Ok(())
    }

    async fn update_transaction(
        &self,
        account_id: &str,
        old: &Transaction,
        mut new: Transaction,
    ) -> Result<(), StoreError> {
        if new.account_id.is_empty() {
            return Err(Error::EmptyAccountId.into());
        }

        let mut transactions = self.lock()?;
        let index = Self::position(&transactions, account_id, &old.id)?;
        new.id = old.id.clone();
        transactions[index] = new;

        Ok(())
    }

    async fn delete_transaction(
        &self,
        account_id: &str,
        transaction: &Transaction,
    ) -> Result<(), StoreError> {
        let mut transactions = self.lock()?;
        let index = Self::position(&transactions, account_id, &transaction.id)?;
        transactions.remove(index);

        Ok(())
    }

    async fn get_all_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.lock()?.clone())
    }
}

#[cfg(test)]
mod memory_transaction_store_tests {
    use crate::{
        StoreError,
        stores::TransactionStore,
        transaction::{Transaction, TransactionType},
    };

    use super::MemoryTransactionStore;

    async fn add(store: &MemoryTransactionStore, account_id: &str, name: &str) -> Transaction {
        store
            .add_transaction(Transaction::build(account_id, name, 100).finalize())
            .await
            .expect("Could not add transaction");

        store
            .get_all_transactions()
            .await
            .unwrap()
            .into_iter()
            .last()
            .unwrap()
    }

    #[tokio::test]
    async fn add_assigns_id() {
        let store = MemoryTransactionStore::new();

        let transaction = add(&store, "acc1", "Coffee").await;

        assert!(!transaction.id.is_empty());
        assert_eq!(transaction.transaction_name, "Coffee");
    }

    #[tokio::test]
    async fn with_transactions_keeps_given_ids() {
        let seeded = vec![
            Transaction::build("acc1", "Rent", 1200).id("rent").finalize(),
            Transaction::build("acc2", "Pay", 3000)
                .id("pay")
                .transaction_type(TransactionType::Income)
                .finalize(),
        ];
        let store = MemoryTransactionStore::with_transactions(seeded.clone());

        assert_eq!(store.get_all_transactions().await.unwrap(), seeded);
        assert_eq!(
            store.get_transaction("acc2", "pay").await.unwrap(),
            seeded[1]
        );
        assert_eq!(
            store.get_transactions("acc1").await.unwrap(),
            vec![seeded[0].clone()]
        );
    }

    #[tokio::test]
    async fn add_replaces_existing_id() {
        let store = MemoryTransactionStore::new();

        store
            .add_transaction(Transaction::build("acc1", "Coffee", 100).id("mine").finalize())
            .await
            .unwrap();

        let got = store.get_all_transactions().await.unwrap();
        assert_ne!(got[0].id, "mine");
    }

    #[tokio::test]
    async fn add_rejects_empty_account() {
        let store = MemoryTransactionStore::new();

        let result = store
            .add_transaction(Transaction::build("", "Coffee", 100).finalize())
            .await;

        assert_eq!(
            result,
            Err(StoreError::failure("a transaction must belong to an account"))
        );
    }

    #[tokio::test]
    async fn get_transactions_filters_by_account() {
        let store = MemoryTransactionStore::new();
        let first = add(&store, "acc1", "Coffee").await;
        add(&store, "acc2", "Rent").await;
        let third = add(&store, "acc1", "Bus").await;

        let got = store.get_transactions("acc1").await.unwrap();

        assert_eq!(got, vec![first, third]);
    }

    #[tokio::test]
    async fn get_transaction_requires_matching_account() {
        let store = MemoryTransactionStore::new();
        let transaction = add(&store, "acc1", "Coffee").await;

        let found = store.get_transaction("acc1", &transaction.id).await;
        let wrong_account = store.get_transaction("acc2", &transaction.id).await;

        assert_eq!(found, Ok(transaction));
        assert!(wrong_account.is_err());
    }

    #[tokio::test]
    async fn update_keeps_id_and_can_move_account() {
        let store = MemoryTransactionStore::new();
        let old = add(&store, "acc1", "Coffee").await;
        let new = Transaction::build("acc2", "Tea", 80)
            .transaction_type(TransactionType::Expense)
            .finalize();

        store.update_transaction("acc1", &old, new).await.unwrap();

        let got = store.get_transaction("acc2", &old.id).await.unwrap();
        assert_eq!(got.transaction_name, "Tea");
        assert_eq!(got.id, old.id);
        assert!(store.get_transactions("acc1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_missing_transaction_fails() {
        let store = MemoryTransactionStore::new();
        let old = Transaction::build("acc1", "Ghost", 1).id("nope").finalize();

        let result = store
            .update_transaction("acc1", &old, old.clone())
            .await;

        assert_eq!(
            result,
            Err(StoreError::failure(
                "the requested transaction could not be found"
            ))
        );
    }

    #[tokio::test]
    async fn delete_removes_transaction() {
        let store = MemoryTransactionStore::new();
        let transaction = add(&store, "acc1", "Coffee").await;

        store
            .delete_transaction("acc1", &transaction)
            .await
            .unwrap();

        assert!(store.get_all_transactions().await.unwrap().is_empty());
        assert!(store.delete_transaction("acc1", &transaction).await.is_err());
    }
}
