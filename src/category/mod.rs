//! Categories group a user's transactions, e.g. 'Mercado' or 'Salário'.
//!
//! Creating a category also assigns it to the user's existing uncategorized
//! transactions whose description mentions the category name.

mod backfill;
mod create;
mod db;
mod domain;
mod list;

pub use create::create_category_endpoint;
pub use db::{category_belongs_to_user, create_category, get_categories};
pub use domain::{Category, CategoryId, CategoryName};
pub use list::list_categories_endpoint;
