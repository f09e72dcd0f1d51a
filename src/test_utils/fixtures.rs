use time::macros::datetime;

use crate::transaction::{Transaction, TransactionType};

/// An `Income` transaction with an ID derived from its account and amount.
pub(crate) fn income(account_id: &str, amount: i64) -> Transaction {
    persisted(account_id, amount, TransactionType::Income)
}

/// An `Expense` transaction with an ID derived from its account and amount.
pub(crate) fn expense(account_id: &str, amount: i64) -> Transaction {
    persisted(account_id, amount, TransactionType::Expense)
}

fn persisted(account_id: &str, amount: i64, transaction_type: TransactionType) -> Transaction {
    Transaction::build(account_id, &format!("{transaction_type} {amount}"), amount)
        .id(&format!("{account_id}-{transaction_type}-{amount}"))
        .date_time(datetime!(2024-10-01 12:00 UTC))
        .transaction_type(transaction_type)
        .finalize()
}
