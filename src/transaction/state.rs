//! The observable state shared between the coordinator and its observers.
//!
//! Each piece of state lives in its own [tokio::sync::watch] channel: the
//! coordinator is the only writer, observers hold read-only [Projection]s.
//! Observers always see the latest value and may miss intermediate ones.

use tokio::sync::watch;

use crate::transaction::core::Transaction;

/// The lifecycle of the most recent store request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    /// No request has been made yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request completed successfully.
    Success,
    /// The last request failed.
    Error(String),
}

/// A read-only view over one piece of [TransactionState].
#[derive(Debug, Clone)]
pub struct Projection<T> {
    receiver: watch::Receiver<T>,
}

impl<T: Clone> Projection<T> {
    fn new(receiver: watch::Receiver<T>) -> Self {
        Self { receiver }
    }

    /// The current value.
    pub fn get(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Start observing the value.
    ///
    /// The first call to [Subscription::changed] yields the current value
    /// straight away, later calls wait for the next write.
    pub fn subscribe(&self) -> Subscription<T> {
        let mut receiver = self.receiver.clone();
        receiver.mark_changed();

        Subscription { receiver }
    }
}

/// A stream of values from a [Projection].
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: watch::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Wait for a value that this subscription has not seen yet.
    ///
    /// Returns `None` once the owning coordinator has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;

        Some(self.receiver.borrow_and_update().clone())
    }

    /// Wait until the value satisfies `predicate` and return it.
    ///
    /// Checks the current value first. Returns `None` if the owning
    /// coordinator is dropped before that happens.
    pub async fn wait_for(&mut self, predicate: impl FnMut(&T) -> bool) -> Option<T> {
        self.receiver
            .wait_for(predicate)
            .await
            .ok()
            .map(|value| value.clone())
    }
}

/// What observers are currently shown: the transaction list, the selected
/// transaction and the status of the last request.
///
/// Every write replaces the whole value of one projection.
#[derive(Debug)]
pub struct TransactionState {
    transactions: watch::Sender<Vec<Transaction>>,
    selected_transaction: watch::Sender<Option<Transaction>>,
    status: watch::Sender<Status>,
}

impl TransactionState {
    /// Create an empty state with an [Status::Idle] status.
    pub fn new() -> Self {
        Self {
            transactions: watch::Sender::new(Vec::new()),
            selected_transaction: watch::Sender::new(None),
            status: watch::Sender::new(Status::Idle),
        }
    }

    /// The transactions from the last successful fetch.
    pub fn transactions(&self) -> Projection<Vec<Transaction>> {
        Projection::new(self.transactions.subscribe())
    }

    /// The currently selected transaction, if any.
    pub fn selected_transaction(&self) -> Projection<Option<Transaction>> {
        Projection::new(self.selected_transaction.subscribe())
    }

    /// The status of the most recent request.
    pub fn status(&self) -> Projection<Status> {
        Projection::new(self.status.subscribe())
    }

    pub(crate) fn current_transactions(&self) -> Vec<Transaction> {
        self.transactions.borrow().clone()
    }

    pub(crate) fn set_transactions(&self, transactions: Vec<Transaction>) {
        self.transactions.send_replace(transactions);
    }

    pub(crate) fn set_selected_transaction(&self, transaction: Option<Transaction>) {
        self.selected_transaction.send_replace(transaction);
    }

    pub(crate) fn set_status(&self, status: Status) {
        self.status.send_replace(status);
    }

    /// Replace the transactions unless `superseded` returns `true`.
    ///
    /// `superseded` is checked while the projection is locked, so no other
    /// write can slip in between the check and the write.
    pub(crate) fn set_transactions_unless(
        &self,
        transactions: Vec<Transaction>,
        superseded: impl FnOnce() -> bool,
    ) -> bool {
        self.transactions
            .send_if_modified(|current| replace_unless(current, transactions, superseded))
    }

    /// Replace the status unless `superseded` returns `true`.
    pub(crate) fn set_status_unless(
        &self,
        status: Status,
        superseded: impl FnOnce() -> bool,
    ) -> bool {
        self.status
            .send_if_modified(|current| replace_unless(current, status, superseded))
    }
}

fn replace_unless<T>(current: &mut T, value: T, superseded: impl FnOnce() -> bool) -> bool {
    if superseded() {
        return false;
    }

    *current = value;
    true
}

impl Default for TransactionState {
    fn default() -> Self {
        Self::new()
    }
}
