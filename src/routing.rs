//! Application router configuration.

use axum::{Router, http::StatusCode, response::Response, routing::get};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    dashboard::{
        get_bar_chart_endpoint, get_combined_endpoint, get_pie_chart_endpoint,
        get_statistics_endpoint,
    },
    endpoints,
    error::render_error,
    transaction::{initialize_endpoint, list_transactions_endpoint},
};

/// Return a router with all the app's routes.
///
/// Every route answers with JSON and accepts cross-origin requests so the
/// dashboard can be served from a different origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::INITIALIZE, get(initialize_endpoint))
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .route(endpoints::STATISTICS, get(get_statistics_endpoint))
        .route(endpoints::BAR_CHART, get(get_bar_chart_endpoint))
        .route(endpoints::PIE_CHART, get(get_pie_chart_endpoint))
        .route(endpoints::COMBINED, get(get_combined_endpoint))
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    render_error(StatusCode::NOT_FOUND, "Not found")
}
