//! JSON endpoints for recording and browsing transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    timezone::get_local_today,
    transaction::{
        Amount, Transaction, TransactionFilter, TransactionFormData, TransactionView,
        create_transaction, delete_transaction, get_transaction, get_transactions,
    },
    user::{UserID, get_user_by_id},
};

/// The state needed to create or query transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Moscow".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Transactions without a date are recorded for today in the server's local timezone.
pub async fn create_transaction_endpoint(
    Path(user_id): Path<i64>,
    State(state): State<TransactionState>,
    Json(form): Json<TransactionFormData>,
) -> Result<Response, Error> {
    let user_id = UserID::new(user_id);
    let amount = Amount::new(form.amount)?;

    let date = match form.date {
        Some(date) => date,
        None => get_local_today(&state.local_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", state.local_timezone);
            Error::InvalidTimezoneError(state.local_timezone.clone())
        })?,
    };

    let builder =
        Transaction::build(form.category_id, amount, date).description(form.description.as_deref());

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(user_id, &connection)?;

    let transaction = create_transaction(user_id, builder, &connection)
        .inspect_err(|error| tracing::error!("could not create transaction: {error}"))?;

    Ok((StatusCode::CREATED, Json(transaction)).into_response())
}

/// List the user's transactions, newest first.
pub async fn get_transactions_endpoint(
    Path(user_id): Path<i64>,
    State(state): State<TransactionState>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<Vec<TransactionView>>, Error> {
    let user_id = UserID::new(user_id);
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(user_id, &connection)?;

    get_transactions(user_id, &filter, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))
        .map(Json)
}

/// Get a single transaction with its category details.
pub async fn get_transaction_endpoint(
    Path((user_id, transaction_id)): Path<(i64, DatabaseId)>,
    State(state): State<TransactionState>,
) -> Result<Json<TransactionView>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transaction(UserID::new(user_id), transaction_id, &connection).map(Json)
}

/// A route handler for deleting a transaction.
pub async fn delete_transaction_endpoint(
    Path((user_id, transaction_id)): Path<(i64, DatabaseId)>,
    State(state): State<TransactionState>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_transaction(UserID::new(user_id), transaction_id, &connection) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(Error::DeleteMissingTransaction) => Err(Error::DeleteMissingTransaction),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            Err(error)
        }
    }
}

#[cfg(test)]
mod transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{Category, CategoryName, CategoryType, create_category},
        db::initialize,
        timezone::get_local_today,
        transaction::{
            TransactionFilter, TransactionFormData,
            handlers::{
                TransactionState, create_transaction_endpoint, delete_transaction_endpoint,
                get_transaction_endpoint, get_transactions_endpoint,
            },
        },
        user::{User, Username, create_user},
    };

    fn get_state() -> (TransactionState, User, Category) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_user(Username::new_unchecked("Maxim"), &connection).unwrap();
        let category = create_category(
            user.id,
            CategoryName::new_unchecked("Продукты"),
            CategoryType::Expense,
            &connection,
        )
        .unwrap();

        let state = TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        (state, user, category)
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let (state, user, category) = get_state();
        let form = TransactionFormData {
            category_id: category.id,
            amount: 250.5,
            date: Some(date!(2025 - 03 - 10)),
            description: Some("Рынок".to_owned()),
        };

        let response =
            create_transaction_endpoint(Path(user.id.as_i64()), State(state.clone()), Json(form))
                .await
                .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let Json(transactions) = get_transactions_endpoint(
            Path(user.id.as_i64()),
            State(state),
            Query(TransactionFilter::default()),
        )
        .await
        .unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 250.5);
        assert_eq!(transactions[0].category_name, "Продукты");
    }

    #[tokio::test]
    async fn missing_date_defaults_to_today() {
        let (state, user, category) = get_state();
        let form = TransactionFormData {
            category_id: category.id,
            amount: 1.0,
            date: None,
            description: None,
        };

        create_transaction_endpoint(Path(user.id.as_i64()), State(state.clone()), Json(form))
            .await
            .unwrap();

        let Json(transaction) = get_transaction_endpoint(Path((user.id.as_i64(), 1)), State(state))
            .await
            .unwrap();
        assert_eq!(Some(transaction.date), get_local_today("Etc/UTC"));
    }

    #[tokio::test]
    async fn create_fails_on_invalid_amount() {
        let (state, user, category) = get_state();
        let form = TransactionFormData {
            category_id: category.id,
            amount: 0.0,
            date: Some(date!(2025 - 03 - 10)),
            description: None,
        };

        let result =
            create_transaction_endpoint(Path(user.id.as_i64()), State(state), Json(form)).await;

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidAmount(0.0, "must be at least 0.01")
        );
    }

    #[tokio::test]
    async fn create_fails_on_unknown_category() {
        let (state, user, _) = get_state();
        let form = TransactionFormData {
            category_id: 404,
            amount: 10.0,
            date: Some(date!(2025 - 03 - 10)),
            description: None,
        };

        let result =
            create_transaction_endpoint(Path(user.id.as_i64()), State(state), Json(form)).await;

        assert_eq!(result.unwrap_err(), Error::InvalidCategory(404));
    }

    #[tokio::test]
    async fn create_fails_on_invalid_timezone_when_date_missing() {
        let (mut state, user, category) = get_state();
        state.local_timezone = "Not/AZone".to_owned();
        let form = TransactionFormData {
            category_id: category.id,
            amount: 10.0,
            date: None,
            description: None,
        };

        let result =
            create_transaction_endpoint(Path(user.id.as_i64()), State(state), Json(form)).await;

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidTimezoneError("Not/AZone".to_owned())
        );
    }

    #[tokio::test]
    async fn delete_removes_transaction() {
        let (state, user, category) = get_state();
        let form = TransactionFormData {
            category_id: category.id,
            amount: 10.0,
            date: Some(date!(2025 - 03 - 10)),
            description: None,
        };
        create_transaction_endpoint(Path(user.id.as_i64()), State(state.clone()), Json(form))
            .await
            .unwrap();

        let status = delete_transaction_endpoint(Path((user.id.as_i64(), 1)), State(state.clone()))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
        let result = delete_transaction_endpoint(Path((user.id.as_i64(), 1)), State(state)).await;
        assert_eq!(result, Err(Error::DeleteMissingTransaction));
    }
}
