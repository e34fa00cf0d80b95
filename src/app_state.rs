//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, pagination::PaginationConfig, transaction::DatasetSource};

/// Options that control how the search text is matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Also match the search text against the price, e.g. "49" matches a
    /// price of 149.99.
    pub match_price: bool,
}

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The config that controls how to page through transactions.
    pub pagination_config: PaginationConfig,

    /// The config that controls how transactions are searched.
    pub search_config: SearchConfig,

    /// The remote dataset used to initialize the database.
    pub dataset_source: DatasetSource,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        dataset_source: DatasetSource,
        pagination_config: PaginationConfig,
        search_config: SearchConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            pagination_config,
            search_config,
            dataset_source,
        })
    }
}
