use rusqlite::Connection;

use crate::{AppState, PaginationConfig, SearchConfig, db::initialize, transaction::DatasetSource};

/// An in-memory database with the tables created.
pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&conn).expect("Could not initialize database");
    conn
}

/// App state backed by an empty in-memory database.
///
/// The dataset URL points at a closed port, tests that initialize the
/// database should replace the dataset source.
pub(crate) fn get_test_state() -> AppState {
    AppState::new(
        Connection::open_in_memory().expect("Could not open in-memory SQLite database"),
        DatasetSource::new("http://127.0.0.1:9/dataset.json")
            .expect("Could not create dataset source"),
        PaginationConfig::default(),
        SearchConfig::default(),
    )
    .expect("Could not create app state")
}
