//! Search and pagination of transactions within a month.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, named_params};
use serde::Deserialize;
use time::Month;

use crate::{
    AppState, Error, SearchConfig,
    db::run_query,
    month::parse_month,
    pagination::{Page, PaginationConfig},
};

use super::core::{TRANSACTION_COLUMNS, Transaction, map_transaction_row};

const FAILURE_MESSAGE: &str = "Failed to fetch transactions";

/// The raw query parameters for listing transactions.
///
/// Everything is read as text so that malformed values produce a JSON error
/// instead of the framework's plain text rejection.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// The month to list, 1-12.
    pub month: Option<String>,
    /// Text to look for in the title or description.
    pub search: Option<String>,
    /// The 1-based page number.
    pub page: Option<String>,
    /// The number of transactions per page.
    pub per_page: Option<String>,
}

/// A validated transaction search.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TransactionFilter {
    /// Only transactions sold in this month, of any year, match.
    pub month: Month,
    /// Matched literally and case-insensitively. Empty matches everything.
    pub search: String,
    /// Whether the search text is also matched against the price.
    pub match_price: bool,
    /// The slice of matching transactions to return.
    pub page: Page,
}

impl TransactionFilter {
    /// Validate the query parameters.
    ///
    /// # Errors
    /// Returns [Error::InvalidRequest] if the month or the page parameters are invalid.
    pub(crate) fn from_params(
        params: &ListParams,
        pagination_config: &PaginationConfig,
        search_config: &SearchConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            month: parse_month(params.month.as_deref())?,
            search: params.search.clone().unwrap_or_default(),
            match_price: search_config.match_price,
            page: Page::from_params(
                params.page.as_deref(),
                params.per_page.as_deref(),
                pagination_config,
            )?,
        })
    }
}

/// Get one page of the transactions that match `filter`, in store order.
///
/// The total number of matches is not returned.
///
/// # Errors
/// Returns [Error::InvalidRequest] if the page offset overflows, or
/// [Error::SqlError] if there is some SQL error.
pub(crate) fn list_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let pattern =
        (!filter.search.is_empty()).then(|| like_pattern(&filter.search.to_lowercase()));
    let price_clause = if filter.match_price {
        " OR CAST(price AS TEXT) LIKE :pattern ESCAPE '\\'"
    } else {
        ""
    };

    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
        WHERE sale_month = :month \
        AND (:pattern IS NULL \
            OR title_folded LIKE :pattern ESCAPE '\\' \
            OR description_folded LIKE :pattern ESCAPE '\\'{price_clause}) \
        ORDER BY id ASC \
        LIMIT :limit OFFSET :offset"
    );

    connection
        .prepare(&query)?
        .query_map(
            named_params! {
                ":month": u8::from(filter.month),
                ":pattern": pattern,
                ":limit": filter.page.limit(),
                ":offset": filter.page.offset()?,
            },
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Build a `LIKE` pattern that matches `search` anywhere in the text.
///
/// Wildcards in `search` are escaped with a backslash so they match literally.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');

    for character in search.chars() {
        if matches!(character, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(character);
    }

    pattern.push('%');
    pattern
}

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Page defaults and limits.
    pub pagination_config: PaginationConfig,
    /// Search behaviour.
    pub search_config: SearchConfig,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
            search_config: state.search_config.clone(),
        }
    }
}

/// List one page of a month's transactions, optionally narrowed by a search.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let filter = match query.map_err(Error::from).and_then(|Query(params)| {
        TransactionFilter::from_params(&params, &state.pagination_config, &state.search_config)
    }) {
        Ok(filter) => filter,
        Err(error) => return error.into_json_response(FAILURE_MESSAGE),
    };

    match run_query(state.db_connection, move |connection| {
        list_transactions(&filter, connection)
    })
    .await
    {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_json_response(FAILURE_MESSAGE),
    }
}
