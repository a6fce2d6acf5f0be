//! Dataset detection
//!
//! Single-word dataset keywords are matched against whitespace tokens in
//! prompt order. Field synonyms may span several words, so they are matched
//! as substrings of the whole prompt in table order.

use prompt_dashboard_core::DatasetType;

use crate::lexicon::Lexicon;

/// Dataset used when nothing in the prompt names one
pub const DEFAULT_DATASET: DatasetType = DatasetType::Sales;

/// The single most likely dataset
pub fn detect_dataset(prompt: &str, lexicon: &Lexicon) -> DatasetType {
    let lower = prompt.to_lowercase();

    lower
        .split_whitespace()
        .find_map(|token| lexicon.dataset_for_token(token))
        .or_else(|| lexicon.first_field_in(&lower).map(|synonym| synonym.dataset))
        .unwrap_or(DEFAULT_DATASET)
}

/// Every dataset the prompt refers to, deduplicated, never empty
///
/// Field synonyms are only consulted when no dataset keyword appears. Order
/// is first-seen order, but callers should not rely on it.
pub fn detect_all_datasets(prompt: &str, lexicon: &Lexicon) -> Vec<DatasetType> {
    let lower = prompt.to_lowercase();
    let mut found: Vec<DatasetType> = Vec::new();

    for dataset in lower
        .split_whitespace()
        .filter_map(|token| lexicon.dataset_for_token(token))
    {
        push_unique(&mut found, dataset);
    }

    if found.is_empty() {
        for synonym in lexicon
            .field_synonyms()
            .iter()
            .filter(|synonym| lower.contains(synonym.keyword.as_str()))
        {
            push_unique(&mut found, synonym.dataset);
        }
    }

    if found.is_empty() {
        found.push(DEFAULT_DATASET);
    }
    found
}

fn push_unique(found: &mut Vec<DatasetType>, dataset: DatasetType) {
    if !found.contains(&dataset) {
        found.push(dataset);
    }
}
