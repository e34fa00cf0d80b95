//! Monthly sale statistics.

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

const FAILURE_MESSAGE: &str = "Failed to fetch statistics";

/// Sales totals for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of the sold items, 0 if nothing was sold.
    pub total_sale_amount: f64,
    /// The number of sold items.
    pub sold_items_count: u32,
    /// The number of items that are not sold.
    pub not_sold_items_count: u32,
}

/// Calculate the sale statistics for the transactions in `month` of any year.
///
/// # Errors
/// Returns [Error::SqlError] if there is some SQL error.
pub(crate) fn get_statistics(month: Month, connection: &Connection) -> Result<Statistics, Error> {
    // TOTAL() is 0.0 rather than NULL when no rows match.
    connection
        .prepare(
            "SELECT TOTAL(CASE WHEN is_sold THEN price END), \
                COUNT(CASE WHEN is_sold THEN 1 END), \
                COUNT(CASE WHEN NOT is_sold THEN 1 END) \
            FROM \"transaction\" WHERE sale_month = ?1",
        )?
        .query_row([u8::from(month)], |row| {
            Ok(Statistics {
                total_sale_amount: row.get(0)?,
                sold_items_count: row.get(1)?,
                not_sold_items_count: row.get(2)?,
            })
        })
        .map_err(Error::from)
}

/// Get the sale statistics for a month.
pub async fn get_statistics_endpoint(
    State(state): State<DashboardState>,
    query: Result<Query<MonthParams>, QueryRejection>,
) -> Response {
    let month = match month_from_query(query) {
        Ok(month) => month,
        Err(error) => return error.into_json_response(FAILURE_MESSAGE),
    };

    match run_query(state.db_connection, move |connection| {
        get_statistics(month, connection)
    })
    .await
    {
        Ok(statistics) => Json(statistics).into_response(),
        Err(error) => error.into_json_response(FAILURE_MESSAGE),
    }
}
