//! The remote JSON dataset used to seed the database.

use reqwest::Client;

use crate::Error;

use super::core::{NewTransaction, parse_dataset};

/// Where the product transaction dataset is published.
pub const DEFAULT_DATASET_URL: &str =
    "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// A remote JSON dataset of transactions.
#[derive(Debug, Clone)]
pub struct DatasetSource {
    url: String,
    client: Client,
}

impl DatasetSource {
    /// Create a source that downloads the dataset from `url`.
    ///
    /// # Errors
    /// Returns [Error::DatasetFetch] if the HTTP client cannot be created.
    pub fn new(url: &str) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(concat!("sales_dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            url: url.to_owned(),
            client,
        })
    }

    /// The URL the dataset is downloaded from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download, decode and validate the dataset.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatasetFetch] if the request fails or the server does not
    ///   answer with a success status,
    /// - [Error::DatasetDecode] if the body is not a JSON array of records,
    /// - or [Error::InvalidRecord] if a record is invalid.
    pub async fn fetch(&self) -> Result<Vec<NewTransaction>, Error> {
        tracing::info!("Fetching dataset from {}", self.url);

        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        tracing::debug!("Downloaded {} bytes", body.len());

        parse_dataset(&body)
    }
}
