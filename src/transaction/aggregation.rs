//! Totals income and expenses over a list of transactions.

use crate::transaction::core::{Transaction, TransactionType};

/// The total income and total expenses of a list of transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IncomeAndExpenses {
    /// Sum of the amounts of all `Income` transactions.
    pub income: i64,
    /// Sum of the amounts of all `Expense` transactions.
    pub expenses: i64,
}

impl IncomeAndExpenses {
    /// Income minus expenses.
    pub fn net(&self) -> i64 {
        self.income.saturating_sub(self.expenses)
    }

    /// The totals as an `(income, expenses)` pair.
    pub fn into_tuple(self) -> (i64, i64) {
        (self.income, self.expenses)
    }
}

/// Sums transaction amounts by transaction type.
///
/// Transactions whose type is neither income nor expense are ignored.
///
/// # Returns
/// The totals, or zero for both if `transactions` is empty.
pub fn income_and_expenses(transactions: &[Transaction]) -> IncomeAndExpenses {
    let mut totals = IncomeAndExpenses::default();

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => {
                totals.income = totals.income.saturating_add(transaction.amount)
            }
            TransactionType::Expense => {
                totals.expenses = totals.expenses.saturating_add(transaction.amount)
            }
            TransactionType::Other(_) => {}
        }
    }

    tracing::debug!(
        income = totals.income,
        expenses = totals.expenses,
        "Totalled {} transactions",
        transactions.len()
    );

    totals
}

#[cfg(test)]
mod tests {
    use crate::transaction::core::{Transaction, TransactionType};

    use super::{IncomeAndExpenses, income_and_expenses};

    fn create_test_transaction(amount: i64, transaction_type: &str) -> Transaction {
        Transaction::build("acc1", "test", amount)
            .transaction_type(TransactionType::from(transaction_type))
            .finalize()
    }

    #[test]
    fn sums_income_and_expenses_separately() {
        let transactions = vec![
            create_test_transaction(500, "Income"),
            create_test_transaction(200, "Expense"),
            create_test_transaction(999, "Other"),
        ];

        let totals = income_and_expenses(&transactions);

        assert_eq!(totals.into_tuple(), (500, 200));
    }

    #[test]
    fn handles_empty_input() {
        assert_eq!(income_and_expenses(&[]), IncomeAndExpenses::default());
    }

    #[test]
    fn accumulates_many_of_each_type() {
        let transactions = vec![
            create_test_transaction(100, "Income"),
            create_test_transaction(250, "Income"),
            create_test_transaction(40, "Expense"),
            create_test_transaction(60, "Expense"),
            create_test_transaction(5, "income"),
        ];

        let totals = income_and_expenses(&transactions);

        assert_eq!(totals.income, 350);
        assert_eq!(totals.expenses, 100);
        assert_eq!(totals.net(), 250);
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let transactions = vec![
            create_test_transaction(i64::MAX, "Income"),
            create_test_transaction(1, "Income"),
        ];

        assert_eq!(income_and_expenses(&transactions).income, i64::MAX);
    }
}
