//! JSON endpoints for budgets.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    budget::{BudgetPeriod, BudgetUsage, create_budget, delete_budget, get_budget_usage},
    database_id::DatabaseId,
    transaction::Amount,
    user::{UserID, get_user_by_id},
};

/// The state needed for the budget endpoints.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// JSON body for budget creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetFormData {
    /// The ID of one of the user's expense categories.
    pub category_id: DatabaseId,
    /// The maximum amount to spend in the period.
    pub amount: f64,
    /// The first day of the budget period.
    pub start_date: Date,
    /// The last day of the budget period.
    pub end_date: Date,
}

/// List the user's budgets with how much has been spent against each.
pub async fn get_budgets_endpoint(
    Path(user_id): Path<i64>,
    State(state): State<BudgetState>,
) -> Result<Json<Vec<BudgetUsage>>, Error> {
    let user_id = UserID::new(user_id);
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(user_id, &connection)?;

    get_budget_usage(user_id, &connection).map(Json)
}

/// Handle budget creation.
pub async fn create_budget_endpoint(
    Path(user_id): Path<i64>,
    State(state): State<BudgetState>,
    Json(form): Json<BudgetFormData>,
) -> Result<Response, Error> {
    let user_id = UserID::new(user_id);
    let amount = Amount::new(form.amount)?;
    let period = BudgetPeriod::new(form.start_date, form.end_date)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(user_id, &connection)?;

    let budget = create_budget(user_id, form.category_id, amount, period, &connection)?;

    Ok((StatusCode::CREATED, Json(budget)).into_response())
}

/// Handle budget deletion.
pub async fn delete_budget_endpoint(
    Path((user_id, budget_id)): Path<(i64, DatabaseId)>,
    State(state): State<BudgetState>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_budget(UserID::new(user_id), budget_id, &connection)
        .inspect_err(|error| tracing::error!("Could not delete budget {budget_id}: {error}"))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod budget_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        budget::handlers::{
            BudgetFormData, BudgetState, create_budget_endpoint, delete_budget_endpoint,
            get_budgets_endpoint,
        },
        category::{Category, CategoryName, CategoryType, create_category},
        db::initialize,
        user::{User, Username, create_user},
    };

    fn get_state() -> (BudgetState, User, Category) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_user(Username::new_unchecked("Maxim"), &connection).unwrap();
        let category = create_category(
            user.id,
            CategoryName::new_unchecked("Жильё"),
            CategoryType::Expense,
            &connection,
        )
        .unwrap();

        let state = BudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, user, category)
    }

    #[tokio::test]
    async fn can_create_and_list_budget() {
        let (state, user, category) = get_state();
        let form = BudgetFormData {
            category_id: category.id,
            amount: 30000.0,
            start_date: date!(2025 - 01 - 01),
            end_date: date!(2025 - 01 - 31),
        };

        let response =
            create_budget_endpoint(Path(user.id.as_i64()), State(state.clone()), Json(form))
                .await
                .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let Json(budgets) = get_budgets_endpoint(Path(user.id.as_i64()), State(state))
            .await
            .unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].spent, 0.0);
        assert_eq!(budgets[0].remaining, 30000.0);
    }

    #[tokio::test]
    async fn create_rejects_inverted_dates() {
        let (state, user, category) = get_state();
        let form = BudgetFormData {
            category_id: category.id,
            amount: 100.0,
            start_date: date!(2025 - 02 - 01),
            end_date: date!(2025 - 01 - 01),
        };

        let result = create_budget_endpoint(Path(user.id.as_i64()), State(state), Json(form)).await;

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidDateRange {
                start: date!(2025 - 02 - 01),
                end: date!(2025 - 01 - 01)
            }
        );
    }

    #[tokio::test]
    async fn create_rejects_non_positive_amount() {
        let (state, user, category) = get_state();
        let form = BudgetFormData {
            category_id: category.id,
            amount: -1.0,
            start_date: date!(2025 - 01 - 01),
            end_date: date!(2025 - 01 - 31),
        };

        let result = create_budget_endpoint(Path(user.id.as_i64()), State(state), Json(form)).await;

        assert!(matches!(result, Err(Error::InvalidAmount(_, _))));
    }

    #[tokio::test]
    async fn delete_missing_budget_returns_error() {
        let (state, user, _) = get_state();

        let result = delete_budget_endpoint(Path((user.id.as_i64(), 7)), State(state)).await;

        assert_eq!(result, Err(Error::DeleteMissingBudget));
    }
}
