//! Database setup, teardown, and the helper for running queries off the async runtime.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, transaction::create_transaction_table};

/// Create all of the database tables for the application.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if a table cannot be created or there is some other SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Close the shared database connection.
///
/// If other references to the connection are still alive the connection is
/// left to be closed when the last one is dropped.
///
/// # Errors
/// Returns an error if SQLite fails to close the connection cleanly.
pub fn close(db_connection: Arc<Mutex<Connection>>) -> Result<(), Error> {
    let connection = match Arc::try_unwrap(db_connection) {
        Ok(mutex) => mutex.into_inner().map_err(|_| Error::DatabaseLockError)?,
        Err(_) => {
            tracing::warn!("database connection is still in use, it will be closed when dropped");
            return Ok(());
        }
    };

    connection.close().map_err(|(_, error)| Error::from(error))
}

/// Run `query` against the shared connection on the blocking thread pool.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned,
/// [Error::TaskFailed] if the task panics, or whatever `query` returns.
pub(crate) async fn run_query<T, F>(
    db_connection: Arc<Mutex<Connection>>,
    query: F,
) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let connection = db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        query(&connection)
    })
    .await
    .map_err(|error| Error::TaskFailed(error.to_string()))?
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::Error;

    use super::{close, initialize, run_query};

    #[test]
    fn initialize_twice_succeeds() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).expect("first initialize failed");
        initialize(&conn).expect("second initialize failed");
    }

    #[test]
    fn close_unshared_connection() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        assert_eq!(close(Arc::new(Mutex::new(conn))), Ok(()));
    }

    #[test]
    fn close_shared_connection_is_deferred() {
        let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let other = conn.clone();

        assert_eq!(close(conn), Ok(()));
        assert!(other.lock().is_ok());
    }

    #[tokio::test]
    async fn run_query_returns_query_result() {
        let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));

        let got = run_query(conn, |connection| {
            connection
                .query_row("SELECT 40 + 2", [], |row| row.get::<_, i64>(0))
                .map_err(Error::from)
        })
        .await;

        assert_eq!(got, Ok(42));
    }

    #[tokio::test]
    async fn run_query_propagates_errors() {
        let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));

        let got: Result<(), Error> = run_query(conn, |_| {
            Err(Error::InvalidRequest("nope".to_owned()))
        })
        .await;

        assert_eq!(got, Err(Error::InvalidRequest("nope".to_owned())));
    }
}
