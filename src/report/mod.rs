//! Summaries and CSV reports over a user's transactions.
//!
//! Every total uses the same rule: "receita" rows are income and all other
//! rows are expenses.

mod aggregation;
mod csv_endpoint;
mod export;
mod summary;

pub use aggregation::{MonthlySummary, Summary, get_monthly_summary, get_summary};
pub use csv_endpoint::{export_transactions_endpoint, monthly_report_endpoint};
pub use export::render_csv;
pub use summary::{get_monthly_summary_endpoint, get_summary_endpoint};
