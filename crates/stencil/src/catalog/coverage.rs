use serde::{Deserialize, Serialize};

use crate::catalog::mapper::MappedElement;
use crate::util::percentage;

/// How much of the detected content the catalog accounts for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub total_detected: usize,
    pub mapped_count: usize,
    pub unmapped_count: usize,
    pub coverage_percentage: f64,
    /// Mapped types, one entry per occurrence, in encounter order.
    pub mapped_types: Vec<String>,
    /// Unmapped types, one entry per occurrence, in encounter order.
    pub unmapped_types: Vec<String>,
    pub catalog_size: usize,
}

impl CoverageReport {
    /// Unmapped types with duplicates removed, first occurrence kept.
    pub fn distinct_unmapped_types(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.unmapped_types
            .iter()
            .map(String::as_str)
            .filter(|t| seen.insert(*t))
            .collect()
    }
}

pub fn analyze_coverage(mapped: &[MappedElement<'_>], catalog_size: usize) -> CoverageReport {
    let mut report = CoverageReport {
        total_detected: mapped.len(),
        catalog_size,
        ..CoverageReport::default()
    };

    for element in mapped {
        let element_type = element.detected.element_type.clone();
        if element.is_mapped() {
            report.mapped_types.push(element_type);
        } else {
            report.unmapped_types.push(element_type);
        }
    }

    report.mapped_count = report.mapped_types.len();
    report.unmapped_count = report.unmapped_types.len();
    report.coverage_percentage = percentage(report.mapped_count, report.total_detected);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogRegistry, ElementMapper};
    use crate::record::DetectedElement;
    use serde_json::json;

    fn registry() -> CatalogRegistry {
        CatalogRegistry::from_value(&json!({
            "sections": {
                "identity": {
                    "title": {"field_id": "title"},
                    "subtitle": {"field_id": "subtitle"}
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_coverage_counts_every_occurrence() {
        let registry = registry();
        let elements = vec![
            DetectedElement::new("title"),
            DetectedElement::new("paragraph"),
            DetectedElement::new("paragraph"),
        ];
        let mapped = ElementMapper::new(&registry).map(&elements);

        let report = analyze_coverage(&mapped, registry.len());
        assert_eq!(report.total_detected, 3);
        assert_eq!(report.mapped_count, 1);
        assert_eq!(report.unmapped_count, 2);
        assert_eq!(report.coverage_percentage, 33.3);
        assert_eq!(report.unmapped_types, ["paragraph", "paragraph"]);
        assert_eq!(report.distinct_unmapped_types(), ["paragraph"]);
        assert_eq!(report.catalog_size, 2);
    }

    #[test]
    fn test_empty_input_has_zero_coverage() {
        let report = analyze_coverage(&[], 10);
        assert_eq!(report.total_detected, 0);
        assert_eq!(report.coverage_percentage, 0.0);
    }

    #[test]
    fn test_counts_always_add_up() {
        let registry = registry();
        let types = ["title", "x", "subtitle", "y", "title", "z", "w"];
        for n in 1..=types.len() {
            let elements: Vec<DetectedElement> =
                types[..n].iter().map(|t| DetectedElement::new(*t)).collect();
            let mapped = ElementMapper::new(&registry).map(&elements);
            let report = analyze_coverage(&mapped, registry.len());
            assert_eq!(report.mapped_count + report.unmapped_count, report.total_detected);
            assert!((0.0..=100.0).contains(&report.coverage_percentage));
        }
    }
}
