//! Core traits and types for the prompt dashboard
//!
//! This crate provides foundational types used across all other crates:
//! - The interpretation model (dataset, component, filters, sort, limit)
//! - Dataset schemas for the three static datasets
//! - The `PromptInterpreter` trait implemented by rule-based and hosted interpreters
//! - Error types

pub mod error;
pub mod interpretation;
pub mod schema;
pub mod traits;

pub use error::{Error, Result};
pub use interpretation::{
    ChartType, ComponentType, DatasetType, Filter, FilterOperator, FilterValue, Interpretation,
    SortDirection, SortSpec,
};
pub use schema::{DatasetSchema, FieldKind, FieldSchema};
pub use traits::PromptInterpreter;
