//! JSON endpoints for savings goals.

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
    database_id::DatabaseId,
    savings_goal::{
        GoalName, NewSavingsGoal, SavingsGoalProgress, create_savings_goal, delete_savings_goal,
        get_savings_goals, saved_amount, update_current_amount,
    },
    transaction::Amount,
    user::{UserID, get_user_by_id},
};

/// The state needed for the savings goal endpoints.
#[derive(Debug, Clone)]
pub struct SavingsGoalState {
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SavingsGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// JSON body for creating a savings goal.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavingsGoalFormData {
    /// What the user is saving for.
    pub name: String,
    /// How much the user wants to save.
    pub target_amount: f64,
    /// How much has been saved already.
    #[serde(default)]
    pub current_amount: f64,
    /// When the user wants to reach the target.
    pub target_date: Date,
    /// Optional notes about the goal.
    #[serde(default)]
    pub description: Option<String>,
}

/// JSON body for updating the amount saved towards a goal.
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentAmountFormData {
    /// How much has been saved so far.
    pub current_amount: f64,
}

/// List the user's savings goals with their progress.
pub async fn get_savings_goals_endpoint(
    Path(user_id): Path<i64>,
    State(state): State<SavingsGoalState>,
) -> Result<Json<Vec<SavingsGoalProgress>>, Error> {
    let user_id = UserID::new(user_id);
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(user_id, &connection)?;

    let goals = get_savings_goals(user_id, &connection)?
        .into_iter()
        .map(SavingsGoalProgress::from)
        .collect();

    Ok(Json(goals))
}

/// Handle savings goal creation.
pub async fn create_savings_goal_endpoint(
    Path(user_id): Path<i64>,
    State(state): State<SavingsGoalState>,
    Json(form): Json<SavingsGoalFormData>,
) -> Result<Response, Error> {
    let user_id = UserID::new(user_id);
    let goal = NewSavingsGoal {
        name: GoalName::new(&form.name)?,
        target_amount: Amount::new(form.target_amount)?,
        current_amount: saved_amount(form.current_amount)?,
        target_date: form.target_date,
        description: form
            .description
            .map(|description| description.trim().to_owned())
            .filter(|description| !description.is_empty()),
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(user_id, &connection)?;

    let goal = create_savings_goal(user_id, goal, &connection)?;

    Ok((StatusCode::CREATED, Json(SavingsGoalProgress::from(goal))).into_response())
}

/// Handle updates to the amount saved towards a goal.
pub async fn update_current_amount_endpoint(
    Path((user_id, goal_id)): Path<(i64, DatabaseId)>,
    State(state): State<SavingsGoalState>,
    Json(form): Json<CurrentAmountFormData>,
) -> Result<Json<SavingsGoalProgress>, Error> {
    let current_amount = saved_amount(form.current_amount)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_current_amount(UserID::new(user_id), goal_id, current_amount, &connection)
        .map(|goal| Json(goal.into()))
}

/// Handle savings goal deletion.
pub async fn delete_savings_goal_endpoint(
    Path((user_id, goal_id)): Path<(i64, DatabaseId)>,
    State(state): State<SavingsGoalState>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_savings_goal(UserID::new(user_id), goal_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod savings_goal_endpoint_tests {
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
        db::initialize,
        savings_goal::handlers::{
            CurrentAmountFormData, SavingsGoalFormData, SavingsGoalState,
            create_savings_goal_endpoint, delete_savings_goal_endpoint,
            get_savings_goals_endpoint, update_current_amount_endpoint,
        },
        user::{User, Username, create_user},
    };

    fn get_state() -> (SavingsGoalState, User) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_user(Username::new_unchecked("Maxim"), &connection).unwrap();

        let state = SavingsGoalState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, user)
    }

    fn holiday_form() -> SavingsGoalFormData {
        SavingsGoalFormData {
            name: "Отпуск".to_owned(),
            target_amount: 200000.0,
            current_amount: 50000.0,
            target_date: date!(2026 - 07 - 01),
            description: Some("  ".to_owned()),
        }
    }

    #[tokio::test]
    async fn can_create_goal() {
        let (state, user) = get_state();

        let response = create_savings_goal_endpoint(
            Path(user.id.as_i64()),
            State(state.clone()),
            Json(holiday_form()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let Json(goals) = get_savings_goals_endpoint(Path(user.id.as_i64()), State(state))
            .await
            .unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].progress, 25.0);
        assert_eq!(goals[0].label, "Отпуск - 25.0%");
        assert_eq!(goals[0].goal.description, None);
    }

    #[tokio::test]
    async fn create_rejects_zero_target() {
        let (state, user) = get_state();
        let form = SavingsGoalFormData {
            target_amount: 0.0,
            ..holiday_form()
        };

        let result =
            create_savings_goal_endpoint(Path(user.id.as_i64()), State(state), Json(form)).await;

        assert!(matches!(result, Err(Error::InvalidAmount(_, _))));
    }

    #[tokio::test]
    async fn can_update_current_amount() {
        let (state, user) = get_state();
        create_savings_goal_endpoint(
            Path(user.id.as_i64()),
            State(state.clone()),
            Json(holiday_form()),
        )
        .await
        .unwrap();

        let Json(goal) = update_current_amount_endpoint(
            Path((user.id.as_i64(), 1)),
            State(state),
            Json(CurrentAmountFormData {
                current_amount: 200000.0,
            }),
        )
        .await
        .unwrap();

        assert_eq!(goal.progress, 100.0);
    }

    #[tokio::test]
    async fn update_rejects_negative_amount() {
        let (state, user) = get_state();

        let result = update_current_amount_endpoint(
            Path((user.id.as_i64(), 1)),
            State(state),
            Json(CurrentAmountFormData {
                current_amount: -5.0,
            }),
        )
        .await;

        assert!(matches!(result, Err(Error::InvalidAmount(_, _))));
    }

    #[tokio::test]
    async fn delete_missing_goal_returns_error() {
        let (state, user) = get_state();

        let result = delete_savings_goal_endpoint(Path((user.id.as_i64(), 1)), State(state)).await;

        assert_eq!(result, Err(Error::DeleteMissingSavingsGoal));
    }
}
