//! Dashboard HTTP handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    dashboard::{
        Dashboard, Locale,
        charts::{DashboardChart, dashboard_charts},
        reports::{DEFAULT_BALANCE_MONTHS, build_dashboard},
    },
    timezone::get_local_today,
    user::{UserID, get_user_by_id},
};

/// The state needed for the dashboard endpoints.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Moscow".
    pub local_timezone: String,
    /// The language for month labels and series names.
    pub locale: Locale,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            locale: state.locale,
        }
    }
}

/// Query parameters for the dashboard endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The number of trailing months in the balance report, six by default.
    #[serde(default)]
    pub months: Option<u32>,
}

/// Get the dashboard reports as label/value series.
pub async fn get_dashboard_endpoint(
    Path(user_id): Path<i64>,
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, Error> {
    load_dashboard(UserID::new(user_id), &state, &query).map(Json)
}

/// Get ECharts options for the dashboard charts.
pub async fn get_dashboard_charts_endpoint(
    Path(user_id): Path<i64>,
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<DashboardChart>>, Error> {
    let dashboard = load_dashboard(UserID::new(user_id), &state, &query)?;

    Ok(Json(dashboard_charts(&dashboard, state.locale)))
}

fn load_dashboard(
    user_id: UserID,
    state: &DashboardState,
    query: &DashboardQuery,
) -> Result<Dashboard, Error> {
    let today = local_today(&state.local_timezone)?;
    let months = query.months.unwrap_or(DEFAULT_BALANCE_MONTHS);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(user_id, &connection)?;

    build_dashboard(user_id, months, today, state.locale, &connection)
        .inspect_err(|error| {
            tracing::error!("could not build dashboard for user {user_id}: {error}")
        })
}

fn local_today(local_timezone: &str) -> Result<Date, Error> {
    get_local_today(local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {local_timezone}");
        Error::InvalidTimezoneError(local_timezone.to_owned())
    })
}
