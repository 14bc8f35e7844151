//! Income and expense transactions.
//!
//! A transaction records an amount of money on a date against one of the
//! user's categories. Whether it is income or an expense is taken from the
//! category whenever transactions are listed or aggregated.

mod db;
mod domain;
mod handlers;

pub use db::{
    count_transactions, create_transaction, create_transaction_table, delete_transaction,
    get_transaction, get_transactions,
};
pub use domain::{
    AMOUNT_UPPER_BOUND, Amount, Transaction, TransactionBuilder, TransactionFilter,
    TransactionFormData, TransactionView, round_to_cents,
};
pub use handlers::{
    create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
    get_transactions_endpoint,
};
