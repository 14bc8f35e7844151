//! Core transaction domain types.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, category::CategoryType, database_id::DatabaseId, user::UserID};

/// The smallest amount of money that can be recorded.
pub const MIN_AMOUNT: f64 = 0.01;

/// Amounts must be smaller than this, i.e. at most eight digits before the decimal point.
pub const AMOUNT_UPPER_BOUND: f64 = 100_000_000.0;

/// A validated, positive amount of money with at most two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    /// Create an amount.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidAmount] if `value` is not finite, is less than
    /// [MIN_AMOUNT], is not less than [AMOUNT_UPPER_BOUND] or has more than two
    /// decimal places.
    pub fn new(value: f64) -> Result<Self, Error> {
        if !value.is_finite() {
            return Err(Error::InvalidAmount(value, "must be a finite number"));
        }

        if value < MIN_AMOUNT {
            return Err(Error::InvalidAmount(value, "must be at least 0.01"));
        }

        if value >= AMOUNT_UPPER_BOUND {
            return Err(Error::InvalidAmount(value, "must be less than 100000000"));
        }

        let cents = value * 100.0;
        if (cents - cents.round()).abs() > 1e-6 {
            return Err(Error::InvalidAmount(
                value,
                "must have at most two decimal places",
            ));
        }

        Ok(Self(cents.round() / 100.0))
    }

    /// The amount as a floating point number.
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// Round a sum of money to whole cents.
///
/// Sums of `f64` amounts pick up representation error, e.g. `0.1 + 0.2`.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Whether it is income or an expense is decided by its category.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// The ID of the category the transaction belongs to.
    pub category_id: DatabaseId,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(category_id: DatabaseId, amount: Amount, date: Date) -> TransactionBuilder {
        TransactionBuilder {
            category_id,
            amount,
            date,
            description: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The category of the transaction, e.g. "Wages", "Groceries".
    pub category_id: DatabaseId,
    /// The amount of money spent or earned.
    pub amount: Amount,
    /// The date when the transaction occurred.
    pub date: Date,
    /// An optional description. Blank descriptions are stored as `None`.
    pub description: Option<String>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<&str>) -> Self {
        self.description = description
            .map(str::trim)
            .filter(|description| !description.is_empty())
            .map(str::to_owned);
        self
    }
}

/// A transaction with its category details, as shown in transaction lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// When the transaction happened.
    pub date: Date,
    /// The ID of the transaction's category.
    pub category_id: DatabaseId,
    /// The name of the transaction's category.
    pub category_name: String,
    /// The type of the transaction's category at the time of the query.
    pub transaction_type: CategoryType,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
}

/// JSON body for transaction creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionFormData {
    /// The ID of one of the user's categories.
    pub category_id: DatabaseId,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// When the transaction happened, defaults to today.
    #[serde(default)]
    pub date: Option<Date>,
    /// A text description of what the transaction was for.
    #[serde(default)]
    pub description: Option<String>,
}

/// Query parameters for filtering the transaction list.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Only include transactions whose category has this type.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<CategoryType>,
    /// Only include transactions on or after this date.
    #[serde(default)]
    pub from: Option<Date>,
    /// Only include transactions on or before this date.
    #[serde(default)]
    pub to: Option<Date>,
    /// Only include transactions whose description or category name contains
    /// this text, ignoring case.
    #[serde(default)]
    pub search: Option<String>,
}


#[cfg(test)]
mod builder_tests {
    use time::macros::date;

    use crate::transaction::{Amount, Transaction};

    #[test]
    fn blank_description_is_none() {
        let builder = Transaction::build(1, Amount::new(1.0).unwrap(), date!(2025 - 01 - 01))
            .description(Some("   "));

        assert_eq!(builder.description, None);
    }

    #[test]
    fn description_is_trimmed() {
        let builder = Transaction::build(1, Amount::new(1.0).unwrap(), date!(2025 - 01 - 01))
            .description(Some(" Rent \n"));

        assert_eq!(builder.description.as_deref(), Some("Rent"));
    }
}
