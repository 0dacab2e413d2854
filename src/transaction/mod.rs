//! Transactions record money earned or spent by a user.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the `NewTransaction` builder
//! - Database functions for storing and querying transactions
//! - Route handlers for creating and listing transactions

mod core;
mod create;
mod list;

pub use core::{
    Kind, NewTransaction, Transaction, TransactionId, create_transaction, get_transactions,
    get_transactions_by_category, get_transactions_in_month,
};
pub use create::create_transaction_endpoint;
pub use list::{list_category_transactions_endpoint, list_transactions_endpoint};
