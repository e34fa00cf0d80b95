//! Product sale transactions.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the dataset records it is imported from
//! - Fetching the remote dataset and replacing the stored transactions with it
//! - Searching and paging through a month's transactions

mod core;
mod dataset;
mod initialize_endpoint;
mod list;
mod sale_date;

pub use core::{
    NewTransaction, Transaction, create_transaction_table, parse_dataset,
    replace_all_transactions,
};
pub use dataset::{DEFAULT_DATASET_URL, DatasetSource};
pub use initialize_endpoint::initialize_endpoint;
pub use list::{ListParams, list_transactions_endpoint};

pub(crate) use list::{TransactionFilter, list_transactions};

#[cfg(test)]
pub use core::count_transactions;
