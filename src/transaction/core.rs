//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, types::Type};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

use super::sale_date::{format_sale_date, parse_sale_date};

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// A catalog item snapshot that was either sold or is still for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction, assigned in dataset order on import.
    pub id: TransactionId,
    /// The name of the item.
    pub title: String,
    /// A longer text description of the item.
    pub description: String,
    /// The price of the item, never negative.
    pub price: f64,
    /// The category label, e.g. "electronics".
    pub category: String,
    /// A URL to a picture of the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// When the item was sold, or listed if it is not sold yet.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// Whether the item has been sold.
    pub is_sold: bool,
}

/// A transaction that has been validated but not yet stored.
///
/// To create a new `NewTransaction` by hand, use [NewTransaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The name of the item.
    pub title: String,
    /// A longer text description of the item.
    pub description: String,
    /// The price of the item.
    pub price: f64,
    /// The category label.
    pub category: String,
    /// A URL to a picture of the item.
    pub image: Option<String>,
    /// When the item was sold.
    pub date_of_sale: OffsetDateTime,
    /// Whether the item has been sold.
    pub is_sold: bool,
}

impl NewTransaction {
    /// Start a new unsold transaction with an empty description and category.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> Self {
        Self {
            title: title.to_owned(),
            description: String::new(),
            price,
            category: String::new(),
            image: None,
            date_of_sale,
            is_sold: false,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set the image URL.
    pub fn image(mut self, image: Option<&str>) -> Self {
        self.image = image.map(str::to_owned);
        self
    }

    /// Set whether the item has been sold.
    pub fn sold(mut self, is_sold: bool) -> Self {
        self.is_sold = is_sold;
        self
    }
}

/// One record of the upstream JSON dataset, before validation.
///
/// The upstream dataset names the sold flag `sold`, both `sold` and `isSold`
/// are accepted. Fields that are not listed here (e.g. the dataset's own `id`)
/// are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetRecord {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    price: f64,
    #[serde(default)]
    category: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(alias = "sold")]
    is_sold: bool,
    date_of_sale: String,
}

impl DatasetRecord {
    fn validate(self, index: usize) -> Result<NewTransaction, Error> {
        let invalid = |reason: String| Error::InvalidRecord { index, reason };

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(invalid(format!(
                "price must be a non-negative number, got {}",
                self.price
            )));
        }

        let date_of_sale = parse_sale_date(&self.date_of_sale).map_err(invalid)?;

        Ok(NewTransaction {
            title: self.title,
            description: self.description,
            price: self.price,
            category: self.category,
            image: self.image.filter(|image| !image.is_empty()),
            date_of_sale,
            is_sold: self.is_sold,
        })
    }
}

/// Decode and validate a JSON array of transaction records.
///
/// # Errors
/// This function will return a:
/// - [Error::DatasetDecode] if `json` is not an array of transaction records,
/// - or [Error::InvalidRecord] if a record has a negative price or an
///   unreadable date.
pub fn parse_dataset(json: &[u8]) -> Result<Vec<NewTransaction>, Error> {
    let records: Vec<DatasetRecord> =
        serde_json::from_slice(json).map_err(|error| Error::DatasetDecode(error.to_string()))?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.validate(index))
        .collect()
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Replace every stored transaction with `transactions`.
///
/// The delete and the inserts run in one SQL transaction, so on error the
/// previous contents are kept. IDs restart from 1 and follow the order of
/// `transactions`.
///
/// The title and description are also stored lowercased for searching, since
/// SQLite's `LIKE` only ignores the case of ASCII letters.
///
/// Returns the number of transactions stored.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidRecord] if a sale date cannot be formatted for storage,
/// - or [Error::SqlError] if there is some SQL error.
pub fn replace_all_transactions(
    transactions: &[NewTransaction],
    connection: &Connection,
) -> Result<usize, Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Immediate)?;

    let deleted = sql_transaction.execute("DELETE FROM \"transaction\"", ())?;
    tracing::debug!("Deleted {deleted} transactions");

    {
        let mut statement = sql_transaction.prepare(
            "INSERT INTO \"transaction\" \
            (title, description, price, category, image, date_of_sale, sale_month, is_sold, \
                title_folded, description_folded) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;

        for (index, transaction) in transactions.iter().enumerate() {
            let date_of_sale = format_sale_date(&transaction.date_of_sale)
                .map_err(|reason| Error::InvalidRecord { index, reason })?;

            statement.execute((
                &transaction.title,
                &transaction.description,
                transaction.price,
                &transaction.category,
                &transaction.image,
                date_of_sale,
                u8::from(transaction.date_of_sale.month()),
                transaction.is_sold,
                transaction.title.to_lowercase(),
                transaction.description.to_lowercase(),
            ))?;
        }
    }

    sql_transaction.commit()?;

    Ok(transactions.len())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    // Plain INTEGER PRIMARY KEY (no AUTOINCREMENT) so IDs restart at 1 after
    // the table is emptied.
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL CHECK (price >= 0),
                category TEXT NOT NULL,
                image TEXT,
                date_of_sale TEXT NOT NULL,
                sale_month INTEGER NOT NULL CHECK (sale_month BETWEEN 1 AND 12),
                is_sold INTEGER NOT NULL,
                title_folded TEXT NOT NULL,
                description_folded TEXT NOT NULL
                )",
        (),
    )?;

    // Every read endpoint filters by month.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_sale_month ON \"transaction\"(sale_month);",
        (),
    )?;

    Ok(())
}

/// The columns read by [map_transaction_row], in order.
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, title, description, price, category, image, date_of_sale, is_sold";

/// Map a database row to a Transaction.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let date_text: String = row.get(6)?;
    let date_of_sale = parse_sale_date(&date_text).map_err(|reason| {
        rusqlite::Error::FromSqlConversionFailure(6, Type::Text, reason.into())
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        image: row.get(5)?,
        date_of_sale,
        is_sold: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod dataset_tests {
    use time::macros::datetime;

    use crate::Error;

    use super::{NewTransaction, parse_dataset};

    #[test]
    fn parses_upstream_records() {
        let json = br#"[
            {
                "id": 1,
                "title": "Fjallraven Backpack",
                "price": 329.85,
                "description": "Your perfect pack for everyday use",
                "category": "men's clothing",
                "image": "https://example.com/1.jpg",
                "sold": false,
                "dateOfSale": "2021-11-27T20:29:54+05:30"
            },
            {
                "title": "Laptop Stand",
                "price": 45,
                "description": "Aluminium",
                "category": "electronics",
                "isSold": true,
                "dateOfSale": "2022-01-05"
            }
        ]"#;

        let got = parse_dataset(json).expect("could not parse dataset");

        assert_eq!(
            got,
            vec![
                NewTransaction::build(
                    "Fjallraven Backpack",
                    329.85,
                    datetime!(2021-11-27 20:29:54 +05:30)
                )
                .description("Your perfect pack for everyday use")
                .category("men's clothing")
                .image(Some("https://example.com/1.jpg")),
                NewTransaction::build("Laptop Stand", 45.0, datetime!(2022-01-05 00:00 UTC))
                    .description("Aluminium")
                    .category("electronics")
                    .sold(true),
            ]
        );
    }

    #[test]
    fn rejects_negative_price() {
        let json = br#"[
            {"title": "a", "price": 1, "sold": true, "dateOfSale": "2022-01-05"},
            {"title": "b", "price": -1, "sold": true, "dateOfSale": "2022-01-05"}
        ]"#;

        let got = parse_dataset(json);

        assert!(
            matches!(got, Err(Error::InvalidRecord { index: 1, .. })),
            "got {got:?}"
        );
    }

    #[test]
    fn rejects_date_without_month() {
        let json = br#"[{"title": "a", "price": 1, "sold": true, "dateOfSale": "soon"}]"#;

        let got = parse_dataset(json);

        assert!(
            matches!(got, Err(Error::InvalidRecord { index: 0, .. })),
            "got {got:?}"
        );
    }

    #[test]
    fn rejects_non_array() {
        let got = parse_dataset(br#"{"message": "Access Denied"}"#);

        assert!(matches!(got, Err(Error::DatasetDecode(_))), "got {got:?}");
    }
}
