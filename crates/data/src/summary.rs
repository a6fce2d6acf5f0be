//! Summary statistics for card components

use serde::Serialize;

use prompt_dashboard_core::DatasetType;

use crate::records::{ProductRecord, SalesRecord, UserRecord};
use crate::store::DatasetStore;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_revenue: f64,
    pub total_units: u64,
    pub total_profit: f64,
    pub avg_monthly_revenue: f64,
    /// Percentage, one decimal place
    pub profit_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersSummary {
    pub total_users: usize,
    pub active_users: usize,
    pub inactive_users: usize,
    pub pending_users: usize,
    /// One decimal place
    pub avg_sessions_per_user: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsSummary {
    pub total_products: usize,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    /// Sum of price times stock
    pub total_inventory_value: f64,
    pub total_units_sold: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DatasetSummary {
    Sales(SalesSummary),
    Users(UsersSummary),
    Products(ProductsSummary),
}

impl DatasetSummary {
    pub fn compute(store: &DatasetStore, dataset: DatasetType) -> Result<Self> {
        Ok(match dataset {
            DatasetType::Sales => Self::Sales(SalesSummary::from_records(&store.typed(dataset)?)),
            DatasetType::Users => Self::Users(UsersSummary::from_records(&store.typed(dataset)?)),
            DatasetType::Products => {
                Self::Products(ProductsSummary::from_records(&store.typed(dataset)?))
            }
        })
    }
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `numerator / denominator`, zero when the denominator is zero
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

impl SalesSummary {
    pub fn from_records(records: &[SalesRecord]) -> Self {
        let total_revenue: f64 = records.iter().map(|r| r.revenue).sum();
        let total_profit: f64 = records.iter().map(|r| r.profit).sum();

        Self {
            total_revenue,
            total_units: records.iter().map(|r| r.units_sold).sum(),
            total_profit,
            avg_monthly_revenue: ratio(total_revenue, records.len() as f64),
            profit_margin: one_decimal(ratio(total_profit, total_revenue) * 100.0),
        }
    }
}

impl UsersSummary {
    pub fn from_records(records: &[UserRecord]) -> Self {
        let count = |status: &str| records.iter().filter(|u| u.status == status).count();
        let total_sessions: u64 = records.iter().map(|u| u.sessions_this_month).sum();

        Self {
            total_users: records.len(),
            active_users: count("active"),
            inactive_users: count("inactive"),
            pending_users: count("pending"),
            avg_sessions_per_user: one_decimal(ratio(total_sessions as f64, records.len() as f64)),
        }
    }
}

impl ProductsSummary {
    pub fn from_records(records: &[ProductRecord]) -> Self {
        let count = |status: &str| records.iter().filter(|p| p.status == status).count();

        Self {
            total_products: records.len(),
            in_stock: count("in_stock"),
            low_stock: count("low_stock"),
            out_of_stock: count("out_of_stock"),
            total_inventory_value: records.iter().map(|p| p.price * p.stock as f64).sum(),
            total_units_sold: records.iter().map(|p| p.total_sold).sum(),
        }
    }
}
