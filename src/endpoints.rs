//! The API endpoints URIs.

/// The route that replaces the stored transactions with the remote dataset.
pub const INITIALIZE: &str = "/api/initialize";
/// The route for searching and paging through a month's transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for a month's sale statistics.
pub const STATISTICS: &str = "/api/statistics";
/// The route for a month's price histogram.
pub const BAR_CHART: &str = "/api/barchart";
/// The route for a month's category breakdown.
pub const PIE_CHART: &str = "/api/piechart";
/// The route for all of the above in one response.
pub const COMBINED: &str = "/api/combined";

// Routes are registered from these constants, so each must parse as a URI path.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::INITIALIZE);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::STATISTICS);
        assert_endpoint_is_valid_uri(endpoints::BAR_CHART);
        assert_endpoint_is_valid_uri(endpoints::PIE_CHART);
        assert_endpoint_is_valid_uri(endpoints::COMBINED);
    }
}
