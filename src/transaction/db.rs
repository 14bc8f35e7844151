//! Database operations for transactions.

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    database_id::DatabaseId,
    transaction::{Transaction, TransactionBuilder, TransactionFilter, TransactionView},
    user::UserID,
};

/// Create a new transaction in the database from `builder`.
///
/// The transaction's category must be one of `user_id`'s categories.
///
/// # Errors
/// Returns [Error::InvalidCategory] if the category does not exist or belongs
/// to another user, or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let category_id = builder.category_id;

    connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, category_id, amount, date, description)
            SELECT ?1, id, ?3, ?4, ?5 FROM category WHERE id = ?2 AND user_id = ?1
            RETURNING id, user_id, category_id, amount, date, description",
        )?
        .query_row(
            (
                user_id.as_i64(),
                category_id,
                builder.amount.as_f64(),
                builder.date,
                builder.description,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::InvalidCategory(category_id),
            error => error.into(),
        })
}

/// Retrieve one of the user's transactions by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to one of the user's transactions.
pub fn get_transaction(
    user_id: UserID,
    id: DatabaseId,
    connection: &Connection,
) -> Result<TransactionView, Error> {
    connection
        .prepare(&format!(
            "{VIEW_SELECT} WHERE t.user_id = :user_id AND t.id = :id"
        ))?
        .query_row(
            rusqlite::named_params! {":user_id": user_id.as_i64(), ":id": id},
            map_view_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the user's transactions that match `filter`, newest first.
///
/// Transactions on the same date are ordered by most recently created first.
pub fn get_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<TransactionView>, Error> {
    let mut query = format!("{VIEW_SELECT} WHERE t.user_id = ?");
    let mut params = vec![Value::Integer(user_id.as_i64())];

    if let Some(transaction_type) = filter.transaction_type {
        query.push_str(" AND c.type = ?");
        params.push(Value::Text(transaction_type.as_str().to_owned()));
    }

    if let Some(from) = filter.from {
        query.push_str(" AND t.date >= ?");
        params.push(Value::Text(from.to_string()));
    }

    if let Some(to) = filter.to {
        query.push_str(" AND t.date <= ?");
        params.push(Value::Text(to.to_string()));
    }

    if let Some(search) = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|search| !search.is_empty())
    {
        query.push_str(
            " AND (instr(lower(coalesce(t.description, '')), lower(?)) > 0 \
            OR instr(lower(c.name), lower(?)) > 0)",
        );
        params.push(Value::Text(search.to_owned()));
        params.push(Value::Text(search.to_owned()));
    }

    query.push_str(" ORDER BY t.date DESC, t.id DESC");

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_view_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Delete one of the user's transactions.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if the transaction does not exist.
pub fn delete_transaction(
    user_id: UserID,
    id: DatabaseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the number of transactions the user has recorded.
pub fn count_transactions(user_id: UserID, connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1",
            (user_id.as_i64(),),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the transaction table and its indexes.
///
/// Requires the user and category tables to exist.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0.01),
            date TEXT NOT NULL,
            description TEXT,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category_id);",
    )?;

    Ok(())
}

const VIEW_SELECT: &str = "SELECT t.id, t.date, t.category_id, c.name, c.type, t.amount, \
    t.description FROM \"transaction\" t INNER JOIN category c ON c.id = t.category_id";

/// Map a row from `RETURNING id, user_id, category_id, amount, date, description`.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category_id: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
        description: row.get(5)?,
    })
}

fn map_view_row(row: &Row) -> Result<TransactionView, rusqlite::Error> {
    Ok(TransactionView {
        id: row.get(0)?,
        date: row.get(1)?,
        category_id: row.get(2)?,
        category_name: row.get(3)?,
        transaction_type: row.get(4)?,
        amount: row.get(5)?,
        description: row.get(6)?,
    })
}

#[cfg(test)]
mod transaction_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{Category, CategoryName, CategoryType, create_category},
        db::initialize,
        transaction::{
            Amount, Transaction, TransactionFilter, count_transactions, create_transaction,
            delete_transaction, get_transaction, get_transactions,
        },
        user::{User, Username, create_user},
    };

    struct Fixture {
        connection: Connection,
        user: User,
        food: Category,
        wages: Category,
    }

    fn get_fixture() -> Fixture {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_user(Username::new_unchecked("Maxim"), &connection).unwrap();
        let food = create_category(
            user.id,
            CategoryName::new_unchecked("Food"),
            CategoryType::Expense,
            &connection,
        )
        .unwrap();
        let wages = create_category(
            user.id,
            CategoryName::new_unchecked("Wages"),
            CategoryType::Income,
            &connection,
        )
        .unwrap();

        Fixture {
            connection,
            user,
            food,
            wages,
        }
    }

    fn amount(value: f64) -> Amount {
        Amount::new(value).unwrap()
    }

    #[test]
    fn create_transaction_succeeds() {
        let fixture = get_fixture();
        let builder = Transaction::build(fixture.food.id, amount(12.3), date!(2025 - 01 - 15))
            .description(Some("Bread"));

        let transaction =
            create_transaction(fixture.user.id, builder, &fixture.connection).unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.user_id, fixture.user.id);
        assert_eq!(transaction.category_id, fixture.food.id);
        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.date, date!(2025 - 01 - 15));
        assert_eq!(transaction.description.as_deref(), Some("Bread"));
    }

    #[test]
    fn create_transaction_fails_on_missing_category() {
        let fixture = get_fixture();
        let builder = Transaction::build(999, amount(1.0), date!(2025 - 01 - 15));

        let result = create_transaction(fixture.user.id, builder, &fixture.connection);

        assert_eq!(result, Err(Error::InvalidCategory(999)));
        assert_eq!(count_transactions(fixture.user.id, &fixture.connection), Ok(0));
    }

    #[test]
    fn create_transaction_fails_on_other_users_category() {
        let fixture = get_fixture();
        let other_user =
            create_user(Username::new_unchecked("Other"), &fixture.connection).unwrap();
        let builder = Transaction::build(fixture.food.id, amount(1.0), date!(2025 - 01 - 15));

        let result = create_transaction(other_user.id, builder, &fixture.connection);

        assert_eq!(result, Err(Error::InvalidCategory(fixture.food.id)));
    }

    #[test]
    fn get_transaction_includes_category_details() {
        let fixture = get_fixture();
        let created = create_transaction(
            fixture.user.id,
            Transaction::build(fixture.wages.id, amount(1000.0), date!(2025 - 01 - 05)),
            &fixture.connection,
        )
        .unwrap();

        let view = get_transaction(fixture.user.id, created.id, &fixture.connection).unwrap();

        assert_eq!(view.category_name, "Wages");
        assert_eq!(view.transaction_type, CategoryType::Income);
        assert_eq!(view.amount, 1000.0);
        assert_eq!(view.description, None);
    }

    #[test]
    fn get_transaction_of_other_user_returns_not_found() {
        let fixture = get_fixture();
        let other_user =
            create_user(Username::new_unchecked("Other"), &fixture.connection).unwrap();
        let created = create_transaction(
            fixture.user.id,
            Transaction::build(fixture.wages.id, amount(1000.0), date!(2025 - 01 - 05)),
            &fixture.connection,
        )
        .unwrap();

        let result = get_transaction(other_user.id, created.id, &fixture.connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_transactions_orders_newest_first() {
        let fixture = get_fixture();
        let dates = [
            date!(2025 - 01 - 10),
            date!(2025 - 03 - 01),
            date!(2025 - 01 - 10),
        ];
        let ids: Vec<_> = dates
            .iter()
            .map(|&date| {
                create_transaction(
                    fixture.user.id,
                    Transaction::build(fixture.food.id, amount(1.0), date),
                    &fixture.connection,
                )
                .unwrap()
                .id
            })
            .collect();

        let transactions = get_transactions(
            fixture.user.id,
            &TransactionFilter::default(),
            &fixture.connection,
        )
        .unwrap();

        let got_ids: Vec<_> = transactions.iter().map(|t| t.id).collect();
        assert_eq!(got_ids, vec![ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn get_transactions_filters_by_type_and_date_range() {
        let fixture = get_fixture();
        for (category_id, date) in [
            (fixture.food.id, date!(2025 - 01 - 31)),
            (fixture.food.id, date!(2025 - 02 - 01)),
            (fixture.food.id, date!(2025 - 02 - 28)),
            (fixture.food.id, date!(2025 - 03 - 01)),
            (fixture.wages.id, date!(2025 - 02 - 05)),
        ] {
            create_transaction(
                fixture.user.id,
                Transaction::build(category_id, amount(1.0), date),
                &fixture.connection,
            )
            .unwrap();
        }

        let filter = TransactionFilter {
            transaction_type: Some(CategoryType::Expense),
            from: Some(date!(2025 - 02 - 01)),
            to: Some(date!(2025 - 02 - 28)),
            search: None,
        };
        let transactions = get_transactions(fixture.user.id, &filter, &fixture.connection).unwrap();

        let dates: Vec<_> = transactions.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date!(2025 - 02 - 28), date!(2025 - 02 - 01)]);
    }

    #[test]
    fn get_transactions_searches_description_and_category_name() {
        let fixture = get_fixture();
        for (category_id, description) in [
            (fixture.food.id, Some("Weekly shop")),
            (fixture.wages.id, Some("January pay")),
            (fixture.wages.id, None),
        ] {
            create_transaction(
                fixture.user.id,
                Transaction::build(category_id, amount(1.0), date!(2025 - 01 - 01))
                    .description(description),
                &fixture.connection,
            )
            .unwrap();
        }

        let by_description = TransactionFilter {
            search: Some("SHOP".to_owned()),
            ..Default::default()
        };
        let by_category = TransactionFilter {
            search: Some("wag".to_owned()),
            ..Default::default()
        };

        let got = get_transactions(fixture.user.id, &by_description, &fixture.connection).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].description.as_deref(), Some("Weekly shop"));

        let got = get_transactions(fixture.user.id, &by_category, &fixture.connection).unwrap();
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn changing_category_type_changes_transaction_type() {
        let fixture = get_fixture();
        let created = create_transaction(
            fixture.user.id,
            Transaction::build(fixture.food.id, amount(5.0), date!(2025 - 01 - 01)),
            &fixture.connection,
        )
        .unwrap();

        crate::category::update_category(
            fixture.user.id,
            fixture.food.id,
            CategoryName::new_unchecked("Food"),
            CategoryType::Income,
            &fixture.connection,
        )
        .unwrap();

        let view = get_transaction(fixture.user.id, created.id, &fixture.connection).unwrap();
        assert_eq!(view.transaction_type, CategoryType::Income);
    }

    #[test]
    fn deleting_category_deletes_its_transactions() {
        let fixture = get_fixture();
        create_transaction(
            fixture.user.id,
            Transaction::build(fixture.food.id, amount(5.0), date!(2025 - 01 - 01)),
            &fixture.connection,
        )
        .unwrap();

        crate::category::delete_category(fixture.user.id, fixture.food.id, &fixture.connection)
            .unwrap();

        assert_eq!(count_transactions(fixture.user.id, &fixture.connection), Ok(0));
    }

    #[test]
    fn delete_transaction_succeeds() {
        let fixture = get_fixture();
        let created = create_transaction(
            fixture.user.id,
            Transaction::build(fixture.food.id, amount(5.0), date!(2025 - 01 - 01)),
            &fixture.connection,
        )
        .unwrap();

        delete_transaction(fixture.user.id, created.id, &fixture.connection).unwrap();

        assert_eq!(
            get_transaction(fixture.user.id, created.id, &fixture.connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_missing_transaction_returns_error() {
        let fixture = get_fixture();

        let result = delete_transaction(fixture.user.id, 42, &fixture.connection);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
    }
}
