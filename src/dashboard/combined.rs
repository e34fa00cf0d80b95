//! All of the dashboard data for a month in a single response.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    db::run_query,
    transaction::{ListParams, Transaction, TransactionFilter, list_transactions},
};

use super::{
    bar_chart::{PriceRangeCount, get_bar_chart_data},
    pie_chart::{CategoryCount, get_pie_chart_data},
    statistics::{Statistics, get_statistics},
};

const FAILURE_MESSAGE: &str = "Failed to fetch combined data";

/// The page of transactions and the three summaries for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    /// The requested page of the month's transactions.
    pub transactions: Vec<Transaction>,
    /// Sales totals for the month.
    pub statistics: Statistics,
    /// The price histogram for the month.
    pub bar_chart_data: Vec<PriceRangeCount>,
    /// The category breakdown for the month.
    pub pie_chart_data: Vec<CategoryCount>,
}

/// Run the four dashboard queries for `filter` concurrently.
///
/// # Errors
/// Returns the first error from any of the queries, no partial data is returned.
pub(crate) async fn get_combined_data(
    state: &AppState,
    filter: TransactionFilter,
) -> Result<CombinedData, Error> {
    let month = filter.month;
    let db_connection = &state.db_connection;

    let (transactions, statistics, bar_chart_data, pie_chart_data) = tokio::try_join!(
        run_query(db_connection.clone(), move |connection| {
            list_transactions(&filter, connection)
        }),
        run_query(db_connection.clone(), move |connection| {
            get_statistics(month, connection)
        }),
        run_query(db_connection.clone(), move |connection| {
            get_bar_chart_data(month, connection)
        }),
        run_query(db_connection.clone(), move |connection| {
            get_pie_chart_data(month, connection)
        }),
    )?;

    Ok(CombinedData {
        transactions,
        statistics,
        bar_chart_data,
        pie_chart_data,
    })
}

/// Get a page of transactions, the statistics, and both charts for a month.
///
/// Takes the same query parameters as the transactions endpoint.
pub async fn get_combined_endpoint(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let filter = match query.map_err(Error::from).and_then(|Query(params)| {
        TransactionFilter::from_params(&params, &state.pagination_config, &state.search_config)
    }) {
        Ok(filter) => filter,
        Err(error) => return error.into_json_response(FAILURE_MESSAGE),
    };

    match get_combined_data(&state, filter).await {
        Ok(data) => Json(data).into_response(),
        Err(error) => error.into_json_response(FAILURE_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use serde_json::json;
    use time::{Month, macros::datetime};

    use crate::{
        endpoints,
        pagination::Page,
        test_utils::get_test_state,
        transaction::{NewTransaction, TransactionFilter, replace_all_transactions},
    };

    use super::{CombinedData, get_combined_data, get_combined_endpoint};

    fn dataset() -> Vec<NewTransaction> {
        vec![
            NewTransaction::build("Laptop", 50.0, datetime!(2022-01-05 10:00 +05:30))
                .category("electronics")
                .sold(true),
            NewTransaction::build("Lamp", 150.0, datetime!(2022-01-06 10:00 +05:30))
                .category("home")
                .sold(true),
            NewTransaction::build("Ring", 950.0, datetime!(2021-01-07 10:00 +05:30))
                .category("jewelery"),
            NewTransaction::build("Shirt", 20.0, datetime!(2022-02-07 10:00 +05:30))
                .category("clothing")
                .sold(true),
        ]
    }

    #[tokio::test]
    async fn combines_all_four_results() {
        let state = get_test_state();
        replace_all_transactions(&dataset(), &state.db_connection.lock().unwrap()).unwrap();
        let filter = TransactionFilter {
            month: Month::January,
            search: String::new(),
            match_price: false,
            page: Page { number: 1, size: 10 },
        };

        let got = get_combined_data(&state, filter).await.unwrap();

        let titles: Vec<_> = got.transactions.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Laptop", "Lamp", "Ring"]);
        assert_eq!(got.statistics.total_sale_amount, 200.0);
        assert_eq!(got.statistics.sold_items_count, 2);
        assert_eq!(got.statistics.not_sold_items_count, 1);
        assert_eq!(got.bar_chart_data.len(), 10);
        assert_eq!(got.bar_chart_data.iter().map(|bar| bar.count).sum::<u32>(), 3);
        assert_eq!(got.pie_chart_data.len(), 3);
    }

    #[tokio::test]
    async fn endpoint_applies_search_to_transactions_only() {
        let state = get_test_state();
        replace_all_transactions(&dataset(), &state.db_connection.lock().unwrap()).unwrap();
        let app = Router::new()
            .route(endpoints::COMBINED, get(get_combined_endpoint))
            .with_state(state);
        let server = TestServer::new(app);

        let response = server
            .get(&format!("{}?month=1&search=lam", endpoints::COMBINED))
            .await;

        response.assert_status_ok();
        let got = response.json::<CombinedData>();
        assert_eq!(got.transactions.len(), 1);
        assert_eq!(got.transactions[0].title, "Lamp");
        assert_eq!(got.statistics.sold_items_count + got.statistics.not_sold_items_count, 3);
    }

    #[tokio::test]
    async fn endpoint_uses_camel_case_keys() {
        let state = get_test_state();
        let app = Router::new()
            .route(endpoints::COMBINED, get(get_combined_endpoint))
            .with_state(state);
        let server = TestServer::new(app);

        let response = server
            .get(&format!("{}?month=4", endpoints::COMBINED))
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["transactions"], json!([]));
        assert_eq!(
            body["statistics"],
            json!({ "totalSaleAmount": 0.0, "soldItemsCount": 0, "notSoldItemsCount": 0 })
        );
        assert!(body["barChartData"].is_array());
        assert_eq!(body["pieChartData"], json!([]));
    }

    #[tokio::test]
    async fn endpoint_fails_as_a_whole_on_invalid_month() {
        let app = Router::new()
            .route(endpoints::COMBINED, get(get_combined_endpoint))
            .with_state(get_test_state());
        let server = TestServer::new(app);

        let response = server
            .get(&format!("{}?month=0", endpoints::COMBINED))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<serde_json::Value>()["error"].is_string());
    }
}
