//! Extractors for filter, sort and limit criteria
//!
//! Each extractor is a pure function of the prompt text. Nothing here fails:
//! a phrase that does not parse simply contributes nothing.

pub mod filters;
pub mod limit;
pub mod sort;

pub use filters::{extract_filters, nearest_field};
pub use limit::extract_limit;
pub use sort::extract_sort;
