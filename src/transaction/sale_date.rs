//! Parsing and formatting of the `dateOfSale` field.

use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

/// Parse a sale date from the dataset.
///
/// Accepts an RFC 3339 date-time such as `2021-11-27T20:29:54+05:30`, or a
/// plain `YYYY-MM-DD` date which is taken as midnight UTC.
///
/// The offset of an RFC 3339 date-time is kept as-is, so the month of the
/// parsed value is the month written in the text.
pub(crate) fn parse_sale_date(text: &str) -> Result<OffsetDateTime, String> {
    let text = text.trim();

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(date_time);
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_utc())
        .map_err(|error| format!("\"{text}\" is not an RFC 3339 date-time or a date: {error}"))
}

/// Format a sale date the way it is stored and served.
pub(crate) fn format_sale_date(date_time: &OffsetDateTime) -> Result<String, String> {
    date_time
        .format(&Rfc3339)
        .map_err(|error| format!("could not format {date_time}: {error}"))
}
