//! JSON endpoints for managing a user's categories.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{
        Category, CategoryChoice, CategoryFilter, CategoryFormData, CategoryName, CategoryScope,
        CategoryType, create_category, delete_category, get_categories, get_category_choices,
        update_category,
    },
    dashboard::Locale,
    database_id::DatabaseId,
    user::{UserID, get_user_by_id},
};

/// The state needed for the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The language used for category type labels.
    pub locale: Locale,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            locale: state.locale,
        }
    }
}

/// Query parameters for the category choices endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryChoicesQuery {
    /// Only offer categories of this type.
    #[serde(default, rename = "type")]
    pub category_type: Option<CategoryType>,
}

/// List the user's categories, optionally filtered by type and name.
pub async fn get_categories_endpoint(
    Path(user_id): Path<i64>,
    State(state): State<CategoryState>,
    Query(filter): Query<CategoryFilter>,
) -> Result<Json<Vec<Category>>, Error> {
    let user_id = UserID::new(user_id);
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(user_id, &connection)?;

    get_categories(user_id, &filter, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))
        .map(Json)
}

/// List the user's categories as labelled choices for a selection list.
pub async fn get_category_choices_endpoint(
    Path(user_id): Path<i64>,
    State(state): State<CategoryState>,
    Query(query): Query<CategoryChoicesQuery>,
) -> Result<Json<Vec<CategoryChoice>>, Error> {
    let user_id = UserID::new(user_id);
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(user_id, &connection)?;

    let scope = CategoryScope {
        user_id,
        category_type: query.category_type,
    };
    let choices = get_category_choices(&scope, &connection)?
        .into_iter()
        .map(|category| CategoryChoice {
            id: category.id,
            label: state.locale.category_label(&category),
        })
        .collect();

    Ok(Json(choices))
}

/// Handle category creation.
pub async fn create_category_endpoint(
    Path(user_id): Path<i64>,
    State(state): State<CategoryState>,
    Json(form): Json<CategoryFormData>,
) -> Result<Response, Error> {
    let user_id = UserID::new(user_id);
    let name = CategoryName::new(&form.name)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(user_id, &connection)?;

    let category = create_category(user_id, name, form.category_type, &connection)
        .inspect_err(|error| {
            tracing::error!("An unexpected error occurred while creating a category: {error}")
        })?;

    Ok((StatusCode::CREATED, Json(category)).into_response())
}

/// Handle updates to a category's name or type.
pub async fn update_category_endpoint(
    Path((user_id, category_id)): Path<(i64, DatabaseId)>,
    State(state): State<CategoryState>,
    Json(form): Json<CategoryFormData>,
) -> Result<Json<Category>, Error> {
    let name = CategoryName::new(&form.name)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_category(
        UserID::new(user_id),
        category_id,
        name,
        form.category_type,
        &connection,
    )
    .map(Json)
}

/// Handle category deletion. The category's transactions and budgets are deleted too.
pub async fn delete_category_endpoint(
    Path((user_id, category_id)): Path<(i64, DatabaseId)>,
    State(state): State<CategoryState>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_category(UserID::new(user_id), category_id, &connection) {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(Error::DeleteMissingCategory) => Err(Error::DeleteMissingCategory),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );
            Err(error)
        }
    }
}
