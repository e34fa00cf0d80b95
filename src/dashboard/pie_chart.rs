//! The number of a month's transactions in each category.

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

const FAILURE_MESSAGE: &str = "Failed to fetch pie chart data";

/// The number of transactions in a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category label.
    pub category: String,
    /// How many transactions are in the category.
    pub count: u32,
}

/// Count the transactions in `month` of any year per category.
///
/// Only categories with at least one transaction that month are returned,
/// sorted by name.
///
/// # Errors
/// Returns [Error::SqlError] if there is some SQL error.
pub(crate) fn get_pie_chart_data(
    month: Month,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    connection
        .prepare(
            "SELECT category, COUNT(id) FROM \"transaction\" \
            WHERE sale_month = ?1 \
            GROUP BY category \
            ORDER BY category ASC",
        )?
        .query_map([u8::from(month)], |row| {
            Ok(CategoryCount {
                category: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .map(|count_result| count_result.map_err(Error::SqlError))
        .collect()
}

/// Get the category breakdown for a month.
pub async fn get_pie_chart_endpoint(
    State(state): State<DashboardState>,
    query: Result<Query<MonthParams>, QueryRejection>,
) -> Response {
    let month = match month_from_query(query) {
        Ok(month) => month,
        Err(error) => return error.into_json_response(FAILURE_MESSAGE),
    };

    match run_query(state.db_connection, move |connection| {
        get_pie_chart_data(month, connection)
    })
    .await
    {
        Ok(categories) => Json(categories).into_response(),
        Err(error) => error.into_json_response(FAILURE_MESSAGE),
    }
}
