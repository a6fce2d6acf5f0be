//! Typed views of dataset records

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub month: String,
    pub revenue: f64,
    pub units_sold: u64,
    pub profit: f64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: u64,
    pub name: String,
    pub email: String,
    /// Admin, Editor or Viewer
    pub role: String,
    /// active, inactive or pending
    pub status: String,
    pub last_active: String,
    pub sessions_this_month: u64,
    pub joined_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: u64,
    /// in_stock, low_stock or out_of_stock
    pub status: String,
    pub rating: f64,
    pub total_sold: u64,
}
