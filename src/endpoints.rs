//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transacoes/{user_id}', use [format_endpoint].

/// The route for checking a username and password.
pub const LOG_IN: &str = "/login";
/// The route for creating a category.
pub const CATEGORIES: &str = "/categorias";
/// The route for listing a user's categories.
pub const USER_CATEGORIES: &str = "/categorias/{user_id}";
/// The route for creating a transaction.
pub const TRANSACTIONS: &str = "/transacoes";
/// The route for listing a user's transactions.
pub const USER_TRANSACTIONS: &str = "/transacoes/{user_id}";
/// The route for listing a user's transactions in one category.
pub const USER_CATEGORY_TRANSACTIONS: &str = "/transacoes/{user_id}/categoria/{category_id}";
/// The route for a user's overall income, expenses and balance.
pub const SUMMARY: &str = "/resumo/{user_id}";
/// The route for a user's income and expenses per month.
pub const MONTHLY_SUMMARY: &str = "/resumo_mensal/{user_id}";
/// The route for downloading one month of a user's transactions as CSV.
pub const MONTHLY_REPORT: &str = "/relatorio_mensal/{user_id}";
/// The route for downloading all of a user's transactions as CSV.
pub const EXPORT: &str = "/exportar_transacoes/{user_id}";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// Endpoints with more than one parameter can be filled in by calling this
/// function once per parameter, from left to right.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_endpoint("/resumo/{user_id}", 1), "/resumo/1");
/// ```
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.char_indices() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
