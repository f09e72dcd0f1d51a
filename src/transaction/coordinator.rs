//! Mediates between a [TransactionStore] and the observers of [TransactionState].
//!
//! Every store-bound operation runs as its own task in the coordinator's
//! [Session]: the status is set to [Status::Loading], the store is awaited,
//! and the outcome is folded into the state. Mutations are followed by a full
//! re-fetch of the affected account instead of patching the local list, so
//! the list always reflects the last successful store read.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    StoreError,
    config::{CoordinatorConfig, FetchOrdering},
    session::Session,
    stores::TransactionStore,
    transaction::{
        aggregation::{IncomeAndExpenses, income_and_expenses},
        core::Transaction,
        state::{Projection, Status, TransactionState},
    },
};

/// The status message used when a store outcome is neither a success nor a
/// failure.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    FetchTransactions,
    FetchAllTransactions,
    GetTransaction,
    AddTransaction,
    UpdateTransaction,
    DeleteTransaction,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::FetchTransactions => "fetch_transactions",
            Operation::FetchAllTransactions => "fetch_all_transactions",
            Operation::GetTransaction => "get_transaction",
            Operation::AddTransaction => "add_transaction_with_account_check",
            Operation::UpdateTransaction => "update_transaction",
            Operation::DeleteTransaction => "delete_transaction",
        }
    }

    /// Shown when the store fails without a message.
    fn fallback_message(self) -> &'static str {
        match self {
            Operation::FetchTransactions | Operation::FetchAllTransactions => {
                "Failed to fetch transactions"
            }
            Operation::GetTransaction => "Failed to get transaction",
            Operation::AddTransaction => "Failed to add transaction",
            Operation::UpdateTransaction => "Failed to update transaction",
            Operation::DeleteTransaction => "Failed to delete transaction",
        }
    }

    fn error_status(self, error: &StoreError) -> Status {
        match error {
            StoreError::Failure { message } => Status::Error(
                message
                    .clone()
                    .unwrap_or_else(|| self.fallback_message().to_owned()),
            ),
            StoreError::Unexpected => Status::Error(UNEXPECTED_ERROR_MESSAGE.to_owned()),
        }
    }
}

/// Which transactions a fetch replaces the list with.
#[derive(Debug, Clone)]
enum FetchScope {
    Account(String),
    All,
}

impl FetchScope {
    fn operation(&self) -> Operation {
        match self {
            FetchScope::Account(_) => Operation::FetchTransactions,
            FetchScope::All => Operation::FetchAllTransactions,
        }
    }
}

/// Runs transaction operations against a store and publishes the results as
/// observable [TransactionState].
///
/// Operations return immediately, their work happens in tasks owned by the
/// coordinator's session. Use [TransactionCoordinator::settle] to wait for
/// them. Dropping the coordinator closes the session and aborts any task
/// still running.
///
/// Requires a Tokio runtime.
#[derive(Debug)]
pub struct TransactionCoordinator<S: TransactionStore> {
    inner: Arc<CoordinatorInner<S>>,
}

#[derive(Debug)]
struct CoordinatorInner<S> {
    store: S,
    state: TransactionState,
    session: Session,
    config: CoordinatorConfig,
    /// The ticket of the most recently issued fetch.
    latest_fetch: AtomicU64,
}

impl<S: TransactionStore> TransactionCoordinator<S> {
    /// Create a coordinator for `store` with the default config.
    pub fn new(store: S) -> Self {
        Self::with_config(store, CoordinatorConfig::default())
    }

    /// Create a coordinator for `store`.
    pub fn with_config(store: S, config: CoordinatorConfig) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                store,
                state: TransactionState::new(),
                session: Session::new(),
                config,
                latest_fetch: AtomicU64::new(0),
            }),
        }
    }

    /// The transactions from the last successful fetch.
    pub fn transactions(&self) -> Projection<Vec<Transaction>> {
        self.inner.state.transactions()
    }

    /// The currently selected transaction.
    pub fn selected_transaction(&self) -> Projection<Option<Transaction>> {
        self.inner.state.selected_transaction()
    }

    /// The status of the most recent request.
    pub fn status(&self) -> Projection<Status> {
        self.inner.state.status()
    }

    /// The session that owns this coordinator's tasks.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Wait until every launched operation, including triggered refreshes,
    /// has finished.
    pub async fn settle(&self) {
        self.inner.session.settle().await;
    }

    /// End the session, aborting every operation still in flight.
    ///
    /// Operations launched afterwards are ignored.
    pub fn close(&self) {
        self.inner.session.close();
    }

    /// Replace the transaction list with the transactions of `account_key`.
    pub fn fetch_transactions(&self, account_key: &str) {
        self.inner
            .launch_fetch(FetchScope::Account(account_key.to_owned()));
    }

    /// Replace the transaction list with the transactions of every account.
    pub fn fetch_all_transactions(&self) {
        tracing::debug!("fetch_all_transactions called");
        self.inner.launch_fetch(FetchScope::All);
    }

    /// Select the transaction `transaction_id` of the account `account_id`.
    ///
    /// The selection is cleared if the store fails.
    pub fn get_transaction(&self, account_id: &str, transaction_id: &str) {
        let inner = self.inner.clone();
        let account_id = account_id.to_owned();
        let transaction_id = transaction_id.to_owned();

        self.inner.session.spawn(async move {
            inner.run_get(account_id, transaction_id).await;
        });
    }

    /// Add `transaction` and then refresh the list of its account.
    pub fn add_transaction_with_account_check(&self, transaction: Transaction) {
        let inner = self.inner.clone();

        self.inner.session.spawn(async move {
            inner.run_add(transaction).await;
        });
    }

    /// Replace `old` in the account `account_id` with `new`, select `new`, and
    /// then refresh the list of the account `new` belongs to.
    pub fn update_transaction(&self, account_id: &str, old: Transaction, new: Transaction) {
        let inner = self.inner.clone();
        let account_id = account_id.to_owned();

        self.inner.session.spawn(async move {
            inner.run_update(account_id, old, new).await;
        });
    }

    /// Delete `transaction` from the account `account_id`, clear the
    /// selection, and then refresh the list of the transaction's account.
    pub fn delete_transaction(&self, account_id: &str, transaction: Transaction) {
        let inner = self.inner.clone();
        let account_id = account_id.to_owned();

        self.inner.session.spawn(async move {
            inner.run_delete(account_id, transaction).await;
        });
    }

    /// Clear the selected transaction. The status and the list are left as
    /// they are.
    pub fn clear_selected_transaction(&self) {
        self.inner.state.set_selected_transaction(None);
    }

    /// Total the income and expenses of the current transaction list.
    pub fn get_income_and_expenses(&self) -> IncomeAndExpenses {
        let totals = income_and_expenses(&self.inner.state.current_transactions());

        tracing::debug!("Expenses: {}", totals.expenses);
        tracing::debug!("Income: {}", totals.income);

        totals
    }
}

impl<S: TransactionStore> Drop for TransactionCoordinator<S> {
    fn drop(&mut self) {
        self.inner.session.close();
    }
}

impl<S: TransactionStore> CoordinatorInner<S> {
    fn launch_fetch(self: &Arc<Self>, scope: FetchScope) {
        let ticket = self.latest_fetch.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = self.clone();

        self.session.spawn(async move {
            inner.run_fetch(scope, ticket).await;
        });
    }

    /// Whether a newer fetch than `ticket` has been issued and responses for
    /// `ticket` should be dropped.
    fn is_stale(&self, ticket: u64) -> bool {
        match self.config.fetch_ordering {
            FetchOrdering::LastWriterWins => false,
            FetchOrdering::DiscardStale => self.latest_fetch.load(Ordering::SeqCst) != ticket,
        }
    }

    fn fail(&self, operation: Operation, error: &StoreError) {
        tracing::error!(
            operation = operation.name(),
            %error,
            "Store operation failed"
        );
        self.state.set_status(operation.error_status(error));
    }

    async fn run_fetch(self: Arc<Self>, scope: FetchScope, ticket: u64) {
        let operation = scope.operation();
        let superseded = || self.is_stale(ticket);

        if !self.state.set_status_unless(Status::Loading, superseded) {
            tracing::debug!(
                operation = operation.name(),
                ticket,
                ?scope,
                "Skipping a superseded fetch"
            );
            return;
        }

        let outcome = match &scope {
            FetchScope::Account(account_key) => self.store.get_transactions(account_key).await,
            FetchScope::All => self.store.get_all_transactions().await,
        };

        let applied = match outcome {
            Ok(transactions) => {
                let count = transactions.len();
                let applied = self.state.set_transactions_unless(transactions, superseded)
                    && self.state.set_status_unless(Status::Success, superseded);

                if applied {
                    tracing::debug!(
                        operation = operation.name(),
                        ?scope,
                        count,
                        "Transactions obtained"
                    );
                }

                applied
            }
            Err(error) => {
                let applied = self
                    .state
                    .set_status_unless(operation.error_status(&error), superseded);

                if applied {
                    tracing::error!(
                        operation = operation.name(),
                        %error,
                        "Store operation failed"
                    );
                }

                applied
            }
        };

        if !applied {
            tracing::debug!(
                operation = operation.name(),
                ticket,
                ?scope,
                "Discarding response from a superseded fetch"
            );
        }
    }

    async fn run_get(self: Arc<Self>, account_id: String, transaction_id: String) {
        let operation = Operation::GetTransaction;
        self.state.set_status(Status::Loading);

        match self
            .store
            .get_transaction(&account_id, &transaction_id)
            .await
        {
            Ok(transaction) => {
                tracing::debug!(
                    operation = operation.name(),
                    %account_id,
                    %transaction_id,
                    "Transaction obtained"
                );
                self.state.set_selected_transaction(Some(transaction));
                self.state.set_status(Status::Success);
            }
            Err(error) => {
                self.fail(operation, &error);
                self.state.set_selected_transaction(None);
            }
        }
    }

    async fn run_add(self: Arc<Self>, transaction: Transaction) {
        let operation = Operation::AddTransaction;
        self.state.set_status(Status::Loading);

        let account_id = transaction.account_id.clone();
        let transaction_name = transaction.transaction_name.clone();

        match self.store.add_transaction(transaction).await {
            Ok(()) => {
                tracing::info!(
                    operation = operation.name(),
                    %account_id,
                    %transaction_name,
                    "Added transaction"
                );
                self.state.set_status(Status::Success);
                self.launch_fetch(FetchScope::Account(account_id));
            }
            Err(error) => self.fail(operation, &error),
        }
    }

    async fn run_update(self: Arc<Self>, account_id: String, old: Transaction, new: Transaction) {
        let operation = Operation::UpdateTransaction;
        self.state.set_status(Status::Loading);

        match self
            .store
            .update_transaction(&account_id, &old, new.clone())
            .await
        {
            Ok(()) => {
                tracing::info!(
                    operation = operation.name(),
                    %account_id,
                    transaction_id = %old.id,
                    new_account_id = %new.account_id,
                    "Updated transaction"
                );
                let refresh_account = new.account_id.clone();
                self.state.set_selected_transaction(Some(new));
                self.state.set_status(Status::Success);
                self.launch_fetch(FetchScope::Account(refresh_account));
            }
            Err(error) => self.fail(operation, &error),
        }
    }

    async fn run_delete(self: Arc<Self>, account_id: String, transaction: Transaction) {
        let operation = Operation::DeleteTransaction;
        self.state.set_status(Status::Loading);

        match self
            .store
            .delete_transaction(&account_id, &transaction)
            .await
        {
            Ok(()) => {
                tracing::info!(
                    operation = operation.name(),
                    %account_id,
                    transaction_id = %transaction.id,
                    "Deleted transaction"
                );
                self.state.set_selected_transaction(None);
                self.state.set_status(Status::Success);
                self.launch_fetch(FetchScope::Account(transaction.account_id));
            }
            Err(error) => self.fail(operation, &error),
        }
    }
}
