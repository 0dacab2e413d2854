//! Resolves "today" in the server's configured timezone.

use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
use time_tz::{Offset, TimeZone};

/// The format dates are stored in, e.g. "2025-03-09".
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Get the current UTC offset of a canonical timezone, e.g. "America/Sao_Paulo".
///
/// Returns `None` if the timezone name is not recognised.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date in `canonical_timezone`, formatted as `YYYY-MM-DD`.
///
/// Falls back to UTC if the timezone is not recognised.
pub fn today(canonical_timezone: &str) -> String {
    let offset = get_local_offset(canonical_timezone).unwrap_or_else(|| {
        tracing::warn!("Unknown timezone \"{canonical_timezone}\", using UTC");
        UtcOffset::UTC
    });

    let date = OffsetDateTime::now_utc().to_offset(offset).date();

    // Formatting a calendar date with this description cannot fail.
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}
