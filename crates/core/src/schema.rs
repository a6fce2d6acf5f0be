//! Dataset schemas
//!
//! Static description of every field in the three datasets. Used to render
//! the schema section of the hosted interpretation prompt and served as-is by
//! the `/api/schema` endpoint.

use serde::Serialize;
use serde_json::{json, Value};

use crate::DatasetType;

/// Value kind of a dataset field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Date,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub description: &'static str,
    #[serde(skip_serializing_if = "no_values")]
    pub possible_values: &'static [&'static str],
}

fn no_values(values: &&'static [&'static str]) -> bool {
    values.is_empty()
}

impl FieldSchema {
    const fn new(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            possible_values: &[],
        }
    }

    const fn with_values(mut self, values: &'static [&'static str]) -> Self {
        self.possible_values = values;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSchema {
    pub dataset: DatasetType,
    pub description: &'static str,
    pub fields: Vec<FieldSchema>,
    pub sample: Value,
}

const MONTHS: &[&str] = &[
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl DatasetSchema {
    /// Schema for a single dataset
    pub fn of(dataset: DatasetType) -> Self {
        match dataset {
            DatasetType::Sales => Self {
                dataset,
                description: "Monthly sales data with revenue, units sold, and profit information",
                fields: vec![
                    FieldSchema::new("month", FieldKind::String, "Month name (Jan, Feb, Mar, etc.)")
                        .with_values(MONTHS),
                    FieldSchema::new("revenue", FieldKind::Number, "Total revenue in dollars"),
                    FieldSchema::new("unitsSold", FieldKind::Number, "Number of units sold"),
                    FieldSchema::new("profit", FieldKind::Number, "Profit amount in dollars"),
                    FieldSchema::new("category", FieldKind::String, "Product category"),
                ],
                sample: json!({
                    "month": "Jan",
                    "revenue": 45000,
                    "unitsSold": 320,
                    "profit": 12500,
                    "category": "Electronics"
                }),
            },
            DatasetType::Users => Self {
                dataset,
                description: "User directory with activity status and engagement metrics",
                fields: vec![
                    FieldSchema::new("id", FieldKind::Number, "User ID"),
                    FieldSchema::new("name", FieldKind::String, "Full name of the user"),
                    FieldSchema::new("email", FieldKind::String, "Email address"),
                    FieldSchema::new("role", FieldKind::String, "User role")
                        .with_values(&["Admin", "Editor", "Viewer"]),
                    FieldSchema::new("status", FieldKind::String, "Account status")
                        .with_values(&["active", "inactive", "pending"]),
                    FieldSchema::new("lastActive", FieldKind::Date, "Last activity timestamp"),
                    FieldSchema::new(
                        "sessionsThisMonth",
                        FieldKind::Number,
                        "Number of sessions this month",
                    ),
                    FieldSchema::new("joinedDate", FieldKind::Date, "Date when user joined"),
                ],
                sample: json!({
                    "id": 1,
                    "name": "John Smith",
                    "email": "john@example.com",
                    "role": "Admin",
                    "status": "active",
                    "sessionsThisMonth": 45
                }),
            },
            DatasetType::Products => Self {
                dataset,
                description: "Product inventory with stock levels and pricing",
                fields: vec![
                    FieldSchema::new("id", FieldKind::Number, "Product ID"),
                    FieldSchema::new("name", FieldKind::String, "Product name"),
                    FieldSchema::new("category", FieldKind::String, "Product category")
                        .with_values(&["Electronics", "Accessories"]),
                    FieldSchema::new("price", FieldKind::Number, "Product price in dollars"),
                    FieldSchema::new("stock", FieldKind::Number, "Current stock quantity"),
                    FieldSchema::new("status", FieldKind::String, "Stock status")
                        .with_values(&["in_stock", "low_stock", "out_of_stock"]),
                    FieldSchema::new("rating", FieldKind::Number, "Product rating (1-5)"),
                    FieldSchema::new("totalSold", FieldKind::Number, "Total units sold"),
                ],
                sample: json!({
                    "id": 1,
                    "name": "Wireless Headphones",
                    "category": "Electronics",
                    "price": 149.99,
                    "stock": 245,
                    "status": "in_stock",
                    "rating": 4.7,
                    "totalSold": 1250
                }),
            },
        }
    }

    /// Schemas for all datasets, in `DatasetType::ALL` order
    pub fn all() -> Vec<Self> {
        DatasetType::ALL.iter().copied().map(Self::of).collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Render this schema as a prompt section
    pub fn describe(&self) -> String {
        let mut out = format!(
            "## {} Dataset\nDescription: {}\nFields:\n",
            self.dataset.as_str().to_uppercase(),
            self.description
        );
        for field in &self.fields {
            out.push_str(&format!(
                "  - {} ({}): {}",
                field.name,
                field.kind.as_str(),
                field.description
            ));
            if !field.possible_values.is_empty() {
                out.push_str(&format!(" [Values: {}]", field.possible_values.join(", ")));
            }
            out.push('\n');
        }
        out.push_str(&format!("Sample record: {}\n", self.sample));
        out
    }
}

/// Schema description of all datasets, for inclusion in model prompts
pub fn schema_prompt() -> String {
    let mut prompt = String::from("Available datasets and their fields:\n\n");
    for schema in DatasetSchema::all() {
        prompt.push_str(&schema.describe());
        prompt.push('\n');
    }
    prompt
}
