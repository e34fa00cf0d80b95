//! Dashboard module
//!
//! Provides the monthly summaries shown on the sales dashboard: sale
//! statistics, a price range histogram, a category breakdown, and an endpoint
//! that returns all of them together with a page of transactions.

use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, Query, rejection::QueryRejection};
use rusqlite::Connection;
use serde::Deserialize;
use time::Month;

use crate::{AppState, Error, month::parse_month};

mod bar_chart;
mod combined;
mod pie_chart;
mod statistics;

pub use bar_chart::get_bar_chart_endpoint;
pub use combined::get_combined_endpoint;
pub use pie_chart::get_pie_chart_endpoint;
pub use statistics::get_statistics_endpoint;

/// The state needed for the single-purpose dashboard endpoints.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters of the endpoints that only take a month.
#[derive(Debug, Default, Deserialize)]
pub struct MonthParams {
    /// The month to summarise, 1-12.
    pub month: Option<String>,
}

/// Validate the query string of an endpoint that only takes a month.
///
/// # Errors
/// Returns [Error::InvalidRequest] if the query string cannot be decoded, e.g.
/// `month` is given twice, or the month is missing or invalid.
fn month_from_query(query: Result<Query<MonthParams>, QueryRejection>) -> Result<Month, Error> {
    let Query(params) = query?;

    parse_month(params.month.as_deref())
}
