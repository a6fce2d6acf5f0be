//! Title and description generation
//!
//! Pure functions of an already-assembled interpretation; no prompt parsing.

use prompt_dashboard_core::Interpretation;

/// Description used when no filter, sort or limit applies
pub const UNFILTERED_DESCRIPTION: &str = "All available data";

/// e.g. "Top 5 Users (Filtered) Data"
pub fn generate_title(interpretation: &Interpretation) -> String {
    let mut title = String::new();
    if let Some(limit) = interpretation.limit {
        title.push_str(&format!("Top {} ", limit));
    }
    title.push_str(interpretation.dataset_type.display_name());
    if !interpretation.filters().is_empty() {
        title.push_str(" (Filtered)");
    }
    title.push(' ');
    title.push_str(interpretation.component_type.title_noun());
    title
}

/// e.g. "Filtered: role = admin • Sorted by name (asc) • Showing top 5 results"
pub fn generate_description(interpretation: &Interpretation) -> String {
    let mut parts = Vec::new();

    let filters = interpretation.filters();
    if !filters.is_empty() {
        let rendered: Vec<String> = filters.iter().map(ToString::to_string).collect();
        parts.push(format!("Filtered: {}", rendered.join(", ")));
    }
    if let Some(sort) = &interpretation.sort {
        parts.push(format!("Sorted by {} ({})", sort.field, sort.direction));
    }
    if let Some(limit) = interpretation.limit {
        parts.push(format!("Showing top {} results", limit));
    }

    if parts.is_empty() {
        UNFILTERED_DESCRIPTION.to_string()
    } else {
        parts.join(" • ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_dashboard_core::{
        ChartType, ComponentType, DatasetType, Filter, FilterOperator, SortDirection, SortSpec,
    };

    fn base(component: ComponentType, dataset: DatasetType) -> Interpretation {
        Interpretation {
            component_type: component,
            dataset_type: dataset,
            chart_type: (component == ComponentType::Chart).then_some(ChartType::Bar),
            filters: None,
            sort: None,
            limit: None,
            title: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_plain_title_and_description() {
        let interpretation = base(ComponentType::Chart, DatasetType::Sales);
        assert_eq!(generate_title(&interpretation), "Sales Chart");
        assert_eq!(generate_description(&interpretation), "All available data");

        assert_eq!(generate_title(&base(ComponentType::Card, DatasetType::Products)), "Products Summary");
    }

    #[test]
    fn test_full_title_and_description() {
        let mut interpretation = base(ComponentType::Table, DatasetType::Users);
        interpretation.filters = Some(vec![
            Filter::new("role", FilterOperator::Eq, "admin"),
            Filter::new("sessionsThisMonth", FilterOperator::Gte, 10.0),
        ]);
        interpretation.sort = Some(SortSpec::new("name", SortDirection::Asc));
        interpretation.limit = Some(5);

        assert_eq!(generate_title(&interpretation), "Top 5 Users (Filtered) Data");
        assert_eq!(
            generate_description(&interpretation),
            "Filtered: role = admin, sessionsThisMonth >= 10 • Sorted by name (asc) • Showing top 5 results"
        );
    }

    #[test]
    fn test_sort_only_description() {
        let mut interpretation = base(ComponentType::Chart, DatasetType::Products);
        interpretation.sort = Some(SortSpec::new("price", SortDirection::Desc));
        assert_eq!(generate_description(&interpretation), "Sorted by price (desc)");
        assert_eq!(generate_title(&interpretation), "Products Chart");
    }
}
