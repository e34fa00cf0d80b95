//! A histogram of a month's transactions over fixed price ranges.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{Error, db::run_query};

use super::{DashboardState, MonthParams, month_from_query};

const FAILURE_MESSAGE: &str = "Failed to fetch bar chart data";

/// One bar of the histogram.
struct PriceRange {
    label: &'static str,
    /// The inclusive upper bound, `None` for the open-ended top range.
    max: Option<f64>,
}

impl PriceRange {
    const fn up_to(label: &'static str, max: f64) -> Self {
        Self {
            label,
            max: Some(max),
        }
    }

    const fn open(label: &'static str) -> Self {
        Self { label, max: None }
    }
}

/// The histogram bars in display order.
///
/// Each range covers prices above the previous range's maximum up to and
/// including its own, so the labels read as integer ranges while fractional
/// prices such as 100.5 still land in exactly one bar.
const PRICE_RANGES: [PriceRange; 10] = [
    PriceRange::up_to("0-100", 100.0),
    PriceRange::up_to("101-200", 200.0),
    PriceRange::up_to("201-300", 300.0),
    PriceRange::up_to("301-400", 400.0),
    PriceRange::up_to("401-500", 500.0),
    PriceRange::up_to("501-600", 600.0),
    PriceRange::up_to("601-700", 700.0),
    PriceRange::up_to("701-800", 800.0),
    PriceRange::up_to("801-900", 900.0),
    PriceRange::open("901-above"),
];

/// The number of transactions in a price range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRangeCount {
    /// The range label, e.g. "101-200".
    pub range: String,
    /// How many transactions have a price in the range.
    pub count: u32,
}

/// Count `prices` per price range, including empty ranges, in range order.
fn count_by_price_range(prices: &[f64]) -> Vec<PriceRangeCount> {
    let mut counts = [0u32; PRICE_RANGES.len()];

    for &price in prices {
        let index = PRICE_RANGES
            .iter()
            .position(|range| range.max.is_none_or(|max| price <= max))
            .unwrap_or(PRICE_RANGES.len() - 1);
        counts[index] += 1;
    }

    PRICE_RANGES
        .iter()
        .zip(counts)
        .map(|(range, count)| PriceRangeCount {
            range: range.label.to_owned(),
            count,
        })
        .collect()
}

/// Build the price histogram for the transactions in `month` of any year.
///
/// # Errors
/// Returns [Error::SqlError] if there is some SQL error.
pub(crate) fn get_bar_chart_data(
    month: Month,
    connection: &Connection,
) -> Result<Vec<PriceRangeCount>, Error> {
    let prices = connection
        .prepare("SELECT price FROM \"transaction\" WHERE sale_month = ?1")?
        .query_map([u8::from(month)], |row| row.get(0))?
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(count_by_price_range(&prices))
}

/// Get the price histogram for a month.
pub async fn get_bar_chart_endpoint(
    State(state): State<DashboardState>,
    query: Result<Query<MonthParams>, QueryRejection>,
) -> Response {
    let month = match month_from_query(query) {
        Ok(month) => month,
        Err(error) => return error.into_json_response(FAILURE_MESSAGE),
    };

    match run_query(state.db_connection, move |connection| {
        get_bar_chart_data(month, connection)
    })
    .await
    {
        Ok(bars) => Json(bars).into_response(),
        Err(error) => error.into_json_response(FAILURE_MESSAGE),
    }
}
