//! Static datasets and the query engine behind the dashboard
//!
//! The three datasets (sales, users, products) are read-only JSON record
//! collections. [`QueryEngine`] applies the filter, sort and limit criteria
//! of an interpretation to them and computes summary statistics for card
//! views.

pub mod engine;
pub mod records;
pub mod store;
pub mod summary;
pub mod value;

pub use engine::{DataQuery, QueryEngine, QueryParams};
pub use records::{ProductRecord, SalesRecord, UserRecord};
pub use store::{DatasetStore, Record};
pub use summary::{DatasetSummary, ProductsSummary, SalesSummary, UsersSummary};

use thiserror::Error;

/// Data layer errors
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Invalid data type: {0}")]
    UnknownDataset(String),

    #[error("Failed to read dataset file {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {dataset} dataset: {source}")]
    Parse {
        dataset: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {dataset} dataset: {message}")]
    InvalidDataset { dataset: String, message: String },
}

impl From<DataError> for prompt_dashboard_core::Error {
    fn from(err: DataError) -> Self {
        match err {
            DataError::UnknownDataset(name) => prompt_dashboard_core::Error::UnknownDataset(name),
            other => prompt_dashboard_core::Error::Data(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
