use std::fmt::Write;

use rust_decimal::Decimal;

use crate::transaction::Transaction;

const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Append-only log of the transactions applied to one account, in the order
/// they were applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    transactions: Vec<Transaction>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Renders the statement for these movements followed by the given balance.
    /// The output depends only on the entries and `balance`.
    pub fn render(&self, balance: Decimal) -> String {
        let mut statement = String::from("\n================ STATEMENT ================\n");
        if self.transactions.is_empty() {
            statement.push_str("No movements recorded.\n");
        }
        for transaction in &self.transactions {
            // Writing into a String cannot fail.
            let _ = writeln!(
                statement,
                "{}:\t$ {:.2} \t({})",
                transaction.kind(),
                transaction.amount(),
                transaction.timestamp().format(TIMESTAMP_FORMAT)
            );
        }
        let _ = writeln!(statement, "\nBalance:\t\t$ {balance:.2}");
        statement.push_str("===========================================");
        statement
    }
}
