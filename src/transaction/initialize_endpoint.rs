//! The endpoint that seeds the database from the remote dataset.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{AppState, Error, db::run_query};

use super::{core::replace_all_transactions, dataset::DatasetSource};

const SUCCESS_MESSAGE: &str = "Database initialized successfully";
const FAILURE_MESSAGE: &str = "Failed to initialize database";

/// The state needed for initializing the database.
#[derive(Debug, Clone)]
pub struct InitializeState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The dataset to seed the database with.
    pub dataset_source: DatasetSource,
}

impl FromRef<AppState> for InitializeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            dataset_source: state.dataset_source.clone(),
        }
    }
}

/// The body of a successful initialization.
#[derive(Debug, Serialize)]
pub struct InitializeResponse {
    /// A human readable confirmation.
    pub message: String,
}

/// Replace the contents of the database with the remote dataset.
///
/// The dataset is downloaded and validated before anything is deleted.
pub async fn initialize_endpoint(State(state): State<InitializeState>) -> Response {
    match initialize_store(state).await {
        Ok(count) => {
            tracing::info!("Initialized the database with {count} transactions");

            Json(InitializeResponse {
                message: SUCCESS_MESSAGE.to_owned(),
            })
            .into_response()
        }
        Err(error) => error.into_json_response(FAILURE_MESSAGE),
    }
}

async fn initialize_store(state: InitializeState) -> Result<usize, Error> {
    let transactions = state.dataset_source.fetch().await?;

    run_query(state.db_connection, move |connection| {
        replace_all_transactions(&transactions, connection)
    })
    .await
}
