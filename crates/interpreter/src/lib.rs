//! Rule-based interpretation of dashboard prompts
//!
//! Turns a free-text request such as "show top 5 users where role is admin"
//! into structured [`Interpretation`]s without calling any external service:
//! - **Lexicon**: ordered keyword tables for datasets, fields and chart kinds
//! - **Detection**: dataset (single and multi), component and chart type
//! - **Extraction**: filters, sort and limit
//! - **Summary**: human-readable title and description
//!
//! # Example
//!
//! ```
//! use prompt_dashboard_interpreter::RuleBasedInterpreter;
//!
//! let interpreter = RuleBasedInterpreter::new();
//! let result = interpreter.interpret("sales revenue above 1000");
//! assert_eq!(result.title, "Sales (Filtered) Data");
//! ```
//!
//! [`Interpretation`]: prompt_dashboard_core::Interpretation

pub mod detection;
pub mod extraction;
pub mod lexicon;
pub mod summary;

mod interpreter;

pub use detection::{detect_all_datasets, detect_chart_type, detect_component, detect_dataset};
pub use extraction::{extract_filters, extract_limit, extract_sort};
pub use interpreter::RuleBasedInterpreter;
pub use lexicon::{FieldSynonym, Lexicon};
