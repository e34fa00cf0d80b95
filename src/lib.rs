//! Sales dashboard is a small web service for exploring product sales data.
//!
//! The service seeds a SQLite database from a remote JSON dataset and serves
//! paginated search, monthly statistics, and chart data as a JSON API.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod dashboard;
mod db;
mod endpoints;
mod error;
mod logging;
mod month;
mod pagination;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, SearchConfig};
pub use db::{close as close_db, initialize as initialize_db};
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use transaction::{
    DEFAULT_DATASET_URL, DatasetSource, NewTransaction, Transaction, parse_dataset,
    replace_all_transactions,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
