//! Dataset, component and chart-type detection

pub mod component;
pub mod dataset;

pub use component::{detect_chart_type, detect_component};
pub use dataset::{detect_all_datasets, detect_dataset, DEFAULT_DATASET};
