//! Dataset storage
//!
//! Records are kept as raw JSON objects so that filters and sorts can refer
//! to any field by name. Each dataset is also checked against its typed
//! record shape when loaded, so a malformed file fails at startup rather
//! than at query time.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use prompt_dashboard_core::DatasetType;

use crate::records::{ProductRecord, SalesRecord, UserRecord};
use crate::{DataError, Result};

/// A single dataset record
pub type Record = Map<String, Value>;

const EMBEDDED_SALES: &str = include_str!("../datasets/sales.json");
const EMBEDDED_USERS: &str = include_str!("../datasets/users.json");
const EMBEDDED_PRODUCTS: &str = include_str!("../datasets/products.json");

/// The three read-only datasets
#[derive(Debug, Clone)]
pub struct DatasetStore {
    sales: Vec<Record>,
    users: Vec<Record>,
    products: Vec<Record>,
}

impl DatasetStore {
    /// Datasets compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_SALES, EMBEDDED_USERS, EMBEDDED_PRODUCTS)
    }

    /// Load `sales.json`, `users.json` and `products.json` from a directory
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let read = |dataset: DatasetType| {
            let path = dir.join(format!("{}.json", dataset));
            std::fs::read_to_string(&path).map_err(|source| DataError::Load {
                path: path.display().to_string(),
                source,
            })
        };

        let store = Self::from_json(
            &read(DatasetType::Sales)?,
            &read(DatasetType::Users)?,
            &read(DatasetType::Products)?,
        )?;
        tracing::info!(directory = %dir.display(), "Loaded datasets from directory");
        Ok(store)
    }

    /// Build from the JSON text of each dataset
    pub fn from_json(sales: &str, users: &str, products: &str) -> Result<Self> {
        let store = Self {
            sales: parse_records(DatasetType::Sales, sales)?,
            users: parse_records(DatasetType::Users, users)?,
            products: parse_records(DatasetType::Products, products)?,
        };

        store.typed::<SalesRecord>(DatasetType::Sales)?;
        store.typed::<UserRecord>(DatasetType::Users)?;
        store.typed::<ProductRecord>(DatasetType::Products)?;

        tracing::debug!(
            sales = store.sales.len(),
            users = store.users.len(),
            products = store.products.len(),
            "Datasets ready"
        );
        Ok(store)
    }

    pub fn records(&self, dataset: DatasetType) -> &[Record] {
        match dataset {
            DatasetType::Sales => &self.sales,
            DatasetType::Users => &self.users,
            DatasetType::Products => &self.products,
        }
    }

    pub fn len(&self, dataset: DatasetType) -> usize {
        self.records(dataset).len()
    }

    pub fn is_empty(&self, dataset: DatasetType) -> bool {
        self.records(dataset).is_empty()
    }

    /// Deserialize a dataset into its typed record shape
    pub fn typed<T: DeserializeOwned>(&self, dataset: DatasetType) -> Result<Vec<T>> {
        self.records(dataset)
            .iter()
            .map(|record| {
                serde_json::from_value(Value::Object(record.clone())).map_err(|source| {
                    DataError::Parse {
                        dataset: dataset.to_string(),
                        source,
                    }
                })
            })
            .collect()
    }
}

fn parse_records(dataset: DatasetType, json: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(json).map_err(|source| DataError::Parse {
        dataset: dataset.to_string(),
        source,
    })?;

    let Value::Array(items) = value else {
        return Err(DataError::InvalidDataset {
            dataset: dataset.to_string(),
            message: "expected a JSON array of records".to_string(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            _ => Err(DataError::InvalidDataset {
                dataset: dataset.to_string(),
                message: format!("record {} is not an object", index),
            }),
        })
        .collect()
}
