//! Renders transactions as CSV.

use crate::{Error, transaction::Transaction};

/// The header row of every CSV report.
pub const CSV_HEADER: [&str; 6] = ["ID", "Valor", "Descrição", "Tipo", "Categoria", "Data"];

/// Render `transactions` as CSV, one row per transaction in the given order.
///
/// The header row is always written, even when there are no transactions.
/// A missing category or date is written as an empty field.
///
/// # Errors
/// Returns an [Error::CsvError] if a row could not be written.
pub fn render_csv(transactions: &[Transaction]) -> Result<String, Error> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buf);

        writer.write_record(CSV_HEADER)?;

        for transaction in transactions {
            writer.serialize((
                transaction.id,
                transaction.amount,
                &transaction.description,
                transaction.kind.as_str(),
                transaction.category.as_deref().unwrap_or_default(),
                transaction.date.as_deref().unwrap_or_default(),
            ))?;
        }

        writer
            .flush()
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    String::from_utf8(buf).map_err(|error| Error::CsvError(error.to_string()))
}
