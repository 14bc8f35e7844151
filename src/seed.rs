//! Fills the database with demo categories and six months of transactions.

use rusqlite::Connection;
use time::{Date, Duration};

use crate::{
    Error,
    category::{CategoryFilter, CategoryName, CategoryType, get_categories, get_or_create_category},
    database_id::DatabaseId,
    transaction::{Amount, Transaction, count_transactions, create_transaction},
    user::{User, Username, get_or_create_user},
};

const INCOME_CATEGORIES: [&str; 5] = [
    "Зарплата",
    "Фриланс",
    "Инвестиции",
    "Подарки",
    "Возврат долгов",
];

const EXPENSE_CATEGORIES: [&str; 10] = [
    "Продукты",
    "Транспорт",
    "Жилье",
    "Развлечения",
    "Одежда",
    "Здоровье",
    "Образование",
    "Кафе и рестораны",
    "Путешествия",
    "Техника",
];

const SEEDED_MONTHS: u32 = 6;

/// A recurring demo transaction.
struct Template {
    category: &'static str,
    day: u8,
    min_amount: u32,
    max_amount: u32,
    description: &'static str,
    /// Only add the transaction for months whose index is a multiple of this.
    every: u32,
}

const TEMPLATES: [Template; 6] = [
    Template {
        category: "Зарплата",
        day: 5,
        min_amount: 80_000,
        max_amount: 120_000,
        description: "Зарплата за месяц",
        every: 1,
    },
    Template {
        category: "Фриланс",
        day: 15,
        min_amount: 10_000,
        max_amount: 30_000,
        description: "Проект для клиента",
        every: 2,
    },
    Template {
        category: "Продукты",
        day: 10,
        min_amount: 15_000,
        max_amount: 25_000,
        description: "Продукты на неделю",
        every: 1,
    },
    Template {
        category: "Транспорт",
        day: 12,
        min_amount: 3_000,
        max_amount: 8_000,
        description: "Проездной и такси",
        every: 1,
    },
    Template {
        category: "Жилье",
        day: 1,
        min_amount: 30_000,
        max_amount: 40_000,
        description: "Аренда квартиры",
        every: 1,
    },
    Template {
        category: "Развлечения",
        day: 20,
        min_amount: 5_000,
        max_amount: 15_000,
        description: "Поход в кино",
        every: 3,
    },
];

/// What the demo user has after seeding.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSummary {
    /// The demo user.
    pub user: User,
    /// The number of categories the user has.
    pub categories: usize,
    /// The number of transactions the user has.
    pub transactions: usize,
}

/// Create the demo user, their categories and six months of transactions.
///
/// Users and categories are reused if they already exist, but transactions
/// are added on every run. Amounts are derived from the month so that the
/// same `today` always produces the same data.
///
/// # Errors
/// Returns an [Error::SqlError] if any insert fails, in which case nothing is written.
pub fn seed_demo_data(
    username: Username,
    today: Date,
    connection: &Connection,
) -> Result<SeedSummary, Error> {
    let transaction = connection.unchecked_transaction()?;

    let user = get_or_create_user(username, &transaction)?;
    tracing::info!("Seeding demo data for user {}", user.id);

    let income = get_or_create_categories(
        &user,
        &INCOME_CATEGORIES,
        CategoryType::Income,
        &transaction,
    )?;
    let expenses = get_or_create_categories(
        &user,
        &EXPENSE_CATEGORIES,
        CategoryType::Expense,
        &transaction,
    )?;
    let category_id = |name: &str| {
        income
            .iter()
            .chain(expenses.iter())
            .find(|(category_name, _)| *category_name == name)
            .map(|(_, id)| *id)
    };

    for month_index in 0..SEEDED_MONTHS {
        let month_ago = today
            .checked_sub(Duration::days(30 * i64::from(month_index)))
            .unwrap_or(Date::MIN);

        for template in TEMPLATES.iter().filter(|t| month_index % t.every == 0) {
            let Some(category_id) = category_id(template.category) else {
                continue;
            };

            let builder = Transaction::build(
                category_id,
                demo_amount(template, month_index)?,
                month_ago.replace_day(template.day).unwrap_or(month_ago),
            )
            .description(Some(template.description));

            create_transaction(user.id, builder, &transaction)?;
        }
    }

    let categories = get_categories(user.id, &CategoryFilter::default(), &transaction)?.len();
    let transactions = count_transactions(user.id, &transaction)?;

    transaction.commit()?;

    tracing::info!("Seeded {categories} categories and {transactions} transactions");

    Ok(SeedSummary {
        user,
        categories,
        transactions,
    })
}

fn get_or_create_categories(
    user: &User,
    names: &[&'static str],
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Vec<(&'static str, DatabaseId)>, Error> {
    names
        .iter()
        .map(|&name| {
            get_or_create_category(
                user.id,
                CategoryName::new_unchecked(name),
                category_type,
                connection,
            )
            .map(|category| (name, category.id))
        })
        .collect()
}

/// Spread the template's amounts evenly over its range, from the minimum for
/// the current month to the maximum five months ago.
fn demo_amount(template: &Template, month_index: u32) -> Result<Amount, Error> {
    let step = (template.max_amount - template.min_amount) / (SEEDED_MONTHS - 1);

    Amount::new(f64::from(template.min_amount + step * month_index))
}
