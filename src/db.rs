//! Creates the application's database schema.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, budget::create_budget_table, category::create_category_table,
    savings_goal::create_savings_goal_table, transaction::create_transaction_table,
    user::create_user_table,
};

/// Create all of the database tables for the application.
///
/// Foreign key enforcement is switched on for `connection`, so deleting a
/// user or category also deletes the rows that belong to it.
///
/// # Errors
/// This function may return a [Error::SqlError] if something went wrong creating the tables.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // The pragma is a no-op inside a transaction, so it must be set first.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_savings_goal_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
