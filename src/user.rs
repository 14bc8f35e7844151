//! Code for creating the user table and fetching users from the database.
//!
//! Users own every other record in the application. There is no log in:
//! callers identify the user explicitly in each request path.

use std::{
    fmt::Display,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

/// The maximum number of characters in a username.
const MAX_USERNAME_LENGTH: usize = 150;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A validated, non-empty username.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Username(String);

impl Username {
    /// Create a username.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyUsername] if `name` is empty
    /// or only whitespace, or an [Error::NameTooLong] if it has more than 150
    /// characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyUsername)
        } else if name.chars().count() > MAX_USERNAME_LENGTH {
            Err(Error::NameTooLong(MAX_USERNAME_LENGTH))
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a username without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's unique name.
    pub username: Username,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a [Error::DuplicateUsername] if the username is taken, or a
/// [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(username: Username, connection: &Connection) -> Result<User, Error> {
    connection
        .execute("INSERT INTO user (username) VALUES (?1)", (username.as_ref(),))
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateUsername(username.to_string()),
            error => error.into(),
        })?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User { id, username })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user with `username`, creating them if they do not exist yet.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn get_or_create_user(username: Username, connection: &Connection) -> Result<User, Error> {
    let existing_user = connection
        .prepare("SELECT id, username FROM user WHERE username = :username")?
        .query_row(&[(":username", username.as_ref())], map_user_row)
        .optional()?;

    match existing_user {
        Some(user) => Ok(user),
        None => create_user(username, connection),
    }
}

fn map_user_row(row: &rusqlite::Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let raw_username: String = row.get(1)?;

    Ok(User {
        id: UserID::new(raw_id),
        username: Username::new_unchecked(&raw_username),
    })
}

/// The state needed for the user endpoints.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for creating a user.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserFormData {
    /// The requested username.
    pub username: String,
}

/// Handle a request to create a new user.
pub async fn create_user_endpoint(
    State(state): State<UserState>,
    Json(form): Json<UserFormData>,
) -> Result<Response, Error> {
    let username = Username::new(&form.username)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = create_user(username, &connection)?;
    tracing::info!("Created user {}", user.id);

    Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// Handle a request to get a user by their ID.
pub async fn get_user_endpoint(
    Path(user_id): Path<i64>,
    State(state): State<UserState>,
) -> Result<Json<User>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(UserID::new(user_id), &connection).map(Json)
}

#[cfg(test)]
mod username_tests {
    use crate::{Error, user::Username};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(Username::new(""), Err(Error::EmptyUsername));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(Username::new(" \t\n"), Err(Error::EmptyUsername));
    }

    #[test]
    fn new_fails_on_long_name() {
        let name = "a".repeat(151);

        assert_eq!(Username::new(&name), Err(Error::NameTooLong(150)));
    }

    #[test]
    fn new_trims_whitespace() {
        assert_eq!(Username::new("  Maxim ").unwrap().as_ref(), "Maxim");
    }
}


#[cfg(test)]
mod user_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        user::{UserFormData, UserState, create_user_endpoint, get_user_endpoint},
    };

    fn get_state() -> UserState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        UserState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn create_user_returns_created() {
        let state = get_state();
        let form = UserFormData {
            username: "Maxim".to_owned(),
        };

        let response = create_user_endpoint(State(state.clone()), Json(form))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let user = get_user_endpoint(Path(1), State(state)).await.unwrap();
        assert_eq!(user.username.as_ref(), "Maxim");
    }

    #[tokio::test]
    async fn create_user_rejects_empty_username() {
        let form = UserFormData {
            username: "   ".to_owned(),
        };

        let result = create_user_endpoint(State(get_state()), Json(form)).await;

        assert_eq!(result.unwrap_err(), Error::EmptyUsername);
    }
}
