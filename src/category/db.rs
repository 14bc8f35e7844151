//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row, params_from_iter, types::Value};

use crate::{
    Error,
    category::{Category, CategoryFilter, CategoryName, CategoryScope, CategoryType},
    database_id::DatabaseId,
    user::UserID,
};

/// Create a category for `user_id` and return it with its generated ID.
pub fn create_category(
    user_id: UserID,
    name: CategoryName,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (user_id, name, type) VALUES (?1, ?2, ?3);",
            (user_id.as_i64(), name.as_ref(), category_type),
        )
        .map_err(|error| map_duplicate_name(error, &name))?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        user_id,
        name,
        category_type,
    })
}

/// Get the user's category called `name`, creating it with `category_type`
/// if it does not exist.
///
/// An existing category keeps its type even if it differs from `category_type`.
pub fn get_or_create_category(
    user_id: UserID,
    name: CategoryName,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Category, Error> {
    let existing = connection
        .prepare(
            "SELECT id, user_id, name, type FROM category
            WHERE user_id = :user_id AND name = :name
            ORDER BY id LIMIT 1;",
        )?
        .query_row(
            rusqlite::named_params! {":user_id": user_id.as_i64(), ":name": name.as_ref()},
            map_row,
        )
        .optional()?;

    match existing {
        Some(category) => Ok(category),
        None => create_category(user_id, name, category_type, connection),
    }
}

/// Retrieve one of the user's categories by ID.
///
/// # Errors
/// Returns [Error::NotFound] if the category does not exist or belongs to another user.
pub fn get_category(
    user_id: UserID,
    category_id: DatabaseId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type FROM category
            WHERE id = :id AND user_id = :user_id;",
        )?
        .query_row(
            rusqlite::named_params! {":id": category_id, ":user_id": user_id.as_i64()},
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the user's categories that match `filter`, ordered by type then name.
pub fn get_categories(
    user_id: UserID,
    filter: &CategoryFilter,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    let mut query = "SELECT id, user_id, name, type FROM category WHERE user_id = ?".to_owned();
    let mut params = vec![Value::Integer(user_id.as_i64())];

    if let Some(category_type) = filter.category_type {
        query.push_str(" AND type = ?");
        params.push(Value::Text(category_type.as_str().to_owned()));
    }

    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query.push_str(" AND instr(lower(name), lower(?)) > 0");
        params.push(Value::Text(search.to_owned()));
    }

    query.push_str(" ORDER BY type ASC, name ASC;");

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the categories that may be chosen within `scope`, ordered by type then name.
pub fn get_category_choices(
    scope: &CategoryScope,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    let filter = CategoryFilter {
        category_type: scope.category_type,
        search: None,
    };

    get_categories(scope.user_id, &filter, connection)
}

/// Update a category's name and type. Returns an error if the category doesn't exist.
///
/// Changing the type immediately changes how the category's existing
/// transactions are counted in reports.
pub fn update_category(
    user_id: UserID,
    category_id: DatabaseId,
    name: CategoryName,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1, type = ?2 WHERE id = ?3 AND user_id = ?4",
            (name.as_ref(), category_type, category_id, user_id.as_i64()),
        )
        .map_err(|error| map_duplicate_name(error, &name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(Category {
        id: category_id,
        user_id,
        name,
        category_type,
    })
}

/// Delete a category by ID, along with its transactions and budgets.
/// Returns an error if the category doesn't exist.
pub fn delete_category(
    user_id: UserID,
    category_id: DatabaseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            UNIQUE(user_id, name),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_type ON category(user_id, type);",
    )?;

    Ok(())
}

fn map_duplicate_name(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateCategoryName(name.to_string()),
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let raw_name: String = row.get(2)?;
    let category_type = row.get(3)?;

    Ok(Category {
        id,
        user_id,
        name: CategoryName::new_unchecked(&raw_name),
        category_type,
    })
}
