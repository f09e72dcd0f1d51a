//! A scripted [TransactionStore] for exercising the coordinator.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::{StoreError, stores::TransactionStore, transaction::Transaction};

/// The store methods, used to script failures and count calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum StoreMethod {
    GetTransactions,
    GetTransaction,
    AddTransaction,
    UpdateTransaction,
    DeleteTransaction,
    GetAllTransactions,
}

/// A recorded call with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StoreCall {
    GetTransactions(String),
    GetTransaction(String, String),
    AddTransaction(Transaction),
    UpdateTransaction(String, Transaction, Transaction),
    DeleteTransaction(String, Transaction),
    GetAllTransactions,
}

impl StoreCall {
    fn method(&self) -> StoreMethod {
        match self {
            StoreCall::GetTransactions(_) => StoreMethod::GetTransactions,
            StoreCall::GetTransaction(..) => StoreMethod::GetTransaction,
            StoreCall::AddTransaction(_) => StoreMethod::AddTransaction,
            StoreCall::UpdateTransaction(..) => StoreMethod::UpdateTransaction,
            StoreCall::DeleteTransaction(..) => StoreMethod::DeleteTransaction,
            StoreCall::GetAllTransactions => StoreMethod::GetAllTransactions,
        }
    }
}

#[derive(Default)]
struct Script {
    /// Account IDs in the order they were first used, so that
    /// `get_all_transactions` is deterministic.
    account_order: Vec<String>,
    accounts: HashMap<String, Vec<Transaction>>,
    failures: HashMap<StoreMethod, StoreError>,
    held_accounts: HashMap<String, oneshot::Receiver<()>>,
    next_id: usize,
    calls: Vec<StoreCall>,
}

impl Script {
    fn account_mut(&mut self, account_id: &str) -> &mut Vec<Transaction> {
        if !self.accounts.contains_key(account_id) {
            self.account_order.push(account_id.to_owned());
        }

        self.accounts.entry(account_id.to_owned()).or_default()
    }

    fn record(&mut self, call: StoreCall) -> Result<(), StoreError> {
        let method = call.method();
        self.calls.push(call);

        match self.failures.get(&method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn not_found() -> StoreError {
        StoreError::failure("Transaction not found")
    }
}

/// A store backed by per-account lists whose failures and response timing
/// are controlled by the test.
///
/// Clones share the same script, so a test can keep a handle after giving
/// the store to a coordinator.
#[derive(Clone, Default)]
pub(crate) struct ScriptedStore {
    script: Arc<Mutex<Script>>,
}

impl ScriptedStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    /// Replace the transactions of `account_id`.
    pub(crate) fn set_account(&self, account_id: &str, transactions: Vec<Transaction>) {
        *self.script().account_mut(account_id) = transactions;
    }

    /// Make every later call to `method` fail with `error`.
    pub(crate) fn fail(&self, method: StoreMethod, error: StoreError) {
        self.script().failures.insert(method, error);
    }

    /// Undo [ScriptedStore::fail] for `method`.
    pub(crate) fn succeed(&self, method: StoreMethod) {
        self.script().failures.remove(&method);
    }

    /// Hold the response of the next `get_transactions(account_key)` until the
    /// returned sender is used or dropped.
    pub(crate) fn hold(&self, account_key: &str) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.script()
            .held_accounts
            .insert(account_key.to_owned(), receiver);

        sender
    }

    /// Every call made so far, in order.
    pub(crate) fn calls(&self) -> Vec<StoreCall> {
        self.script().calls.clone()
    }

    /// The number of calls made to `method`.
    pub(crate) fn count(&self, method: StoreMethod) -> usize {
        self.script()
            .calls
            .iter()
            .filter(|call| call.method() == method)
            .count()
    }
}

#[async_trait]
impl TransactionStore for ScriptedStore {
    async fn get_transactions(&self, account_key: &str) -> Result<Vec<Transaction>, StoreError> {
        let held = {
            let mut script = self.script();
            script.record(StoreCall::GetTransactions(account_key.to_owned()))?;
            script.held_accounts.remove(account_key)
        };

        if let Some(held) = held {
            let _ = held.await;
        }

        Ok(self
            .script()
            .accounts
            .get(account_key)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction, StoreError> {
        let mut script = self.script();
        script.record(StoreCall::GetTransaction(
            account_id.to_owned(),
            transaction_id.to_owned(),
        ))?;

        script
            .accounts
            .get(account_id)
            .and_then(|transactions| {
                transactions
                    .iter()
                    .find(|transaction| transaction.id == transaction_id)
            })
            .cloned()
            .ok_or_else(Script::not_found)
    }

    async fn add_transaction(&self, mut transaction: Transaction) -> Result<(), StoreError> {
        let mut script = self.script();
        script.record(StoreCall::AddTransaction(transaction.clone()))?;

        script.next_id += 1;
        transaction.id = format!("added-{}", script.next_id);
        script.account_mut(&transaction.account_id.clone()).push(transaction);

        Ok(())
    }

    async fn update_transaction(
        &self,
        account_id: &str,
        old: &Transaction,
        mut new: Transaction,
    ) -> Result<(), StoreError> {
        let mut script = self.script();
        script.record(StoreCall::UpdateTransaction(
            account_id.to_owned(),
            old.clone(),
            new.clone(),
        ))?;

        let transactions = script.account_mut(account_id);
        let index = transactions
            .iter()
            .position(|transaction| transaction.id == old.id)
            .ok_or_else(Script::not_found)?;
        transactions.remove(index);

        new.id = old.id.clone();
        script.account_mut(&new.account_id.clone()).push(new);

        Ok(())
    }

    async fn delete_transaction(
        &self,
        account_id: &str,
        transaction: &Transaction,
    ) -> Result<(), StoreError> {
        let mut script = self.script();
        script.record(StoreCall::DeleteTransaction(
            account_id.to_owned(),
            transaction.clone(),
        ))?;

        let transactions = script.account_mut(account_id);
        let index = transactions
            .iter()
            .position(|candidate| candidate.id == transaction.id)
            .ok_or_else(Script::not_found)?;
        transactions.remove(index);

        Ok(())
    }

    async fn get_all_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let mut script = self.script();
        script.record(StoreCall::GetAllTransactions)?;

        Ok(script
            .account_order
            .iter()
            .filter_map(|account_id| script.accounts.get(account_id))
            .flatten()
            .cloned()
            .collect())
    }
}
