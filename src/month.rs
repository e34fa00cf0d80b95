//! Parsing of the `month` query parameter shared by every read endpoint.

use time::Month;

use crate::Error;

/// Parse the `month` query parameter.
///
/// Accepts one or two ASCII digits naming a month from 1 to 12, so "1" and
/// "01" both mean January. Surrounding whitespace is ignored.
///
/// # Errors
/// Returns [Error::InvalidRequest] if `month` is missing, is not a one or two
/// digit number, or is outside 1-12.
pub(crate) fn parse_month(month: Option<&str>) -> Result<Month, Error> {
    let text = month
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            Error::InvalidRequest("the query parameter \"month\" is required".to_owned())
        })?;

    let invalid = || {
        Error::InvalidRequest(format!(
            "\"{text}\" is not a valid month, expected a number from 1 to 12"
        ))
    };

    if text.len() > 2 || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }

    let number: u8 = text.parse().map_err(|_| invalid())?;

    Month::try_from(number).map_err(|_| invalid())
}
