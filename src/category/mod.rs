//! Income and expense categories.
//!
//! Every transaction belongs to one category, and the category's type decides
//! whether the transaction counts as income or as an expense.

mod db;
mod domain;
mod handlers;

pub use db::{
    create_category, create_category_table, delete_category, get_categories, get_category,
    get_category_choices, get_or_create_category, update_category,
};
pub use domain::{
    Category, CategoryChoice, CategoryFilter, CategoryFormData, CategoryName, CategoryScope,
    CategoryType, MAX_CATEGORY_NAME_LENGTH,
};
pub use handlers::{
    create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
    get_category_choices_endpoint, update_category_endpoint,
};
