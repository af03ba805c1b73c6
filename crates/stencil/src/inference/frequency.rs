//! Cross-document statistics per element type.
//!
//! These feed block optionality and the template-level `common_elements`
//! and `document_fields` sections.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogElementDefinition, ElementMapper, MappingStatus, CUSTOM_CATEGORY};
use crate::config::Thresholds;
use crate::inference::similarity::StaticityCheck;
use crate::record::{DetectedElement, PageRecord, PiiType};
use crate::template::FieldSchema;
use crate::util::percentage;

/// Number of text samples kept per element type.
pub const MAX_CONTENT_SAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementFrequency {
    pub total_count: usize,
    pub document_count: usize,
    pub document_percentage: f64,
    pub page_numbers: Vec<u32>,
    pub mapping_status: MappingStatus,
    pub category: String,
    pub is_static: bool,
    /// Distinct non-NONE PII types, in encounter order.
    pub pii_types: Vec<PiiType>,
    pub content_samples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub is_static: bool,
    pub sample_content: Vec<String>,
    pub pii_detected: Vec<PiiType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonElement {
    /// Mapped field id: the catalog id, or the `custom_` id.
    pub element_type: String,
    pub source_type: String,
    pub category: String,
    pub frequency_percentage: f64,
    pub appears_in_documents: usize,
    pub mapping_status: MappingStatus,
    pub catalog_definition: Option<CatalogElementDefinition>,
    pub field_schema: FieldSchema,
    pub content_analysis: ContentAnalysis,
}

/// A field present in every document with PII attached, such as the
/// company name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentField {
    pub field_id: String,
    pub label: String,
    pub data_type: String,
    pub pii_type: PiiType,
    pub source_type: String,
    pub category: String,
    pub sample_values: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FrequencyAnalysis {
    pub total_documents: usize,
    pub element_frequency: BTreeMap<String, ElementFrequency>,
    pub common_elements: Vec<CommonElement>,
    pub document_fields: Vec<DocumentField>,
}

impl FrequencyAnalysis {
    /// Document percentage of a type; types never seen count as 100.
    pub fn document_percentage(&self, element_type: &str) -> f64 {
        self.element_frequency
            .get(element_type)
            .map(|f| f.document_percentage)
            .unwrap_or(100.0)
    }

    pub fn total_occurrences(&self, element_type: &str) -> usize {
        self.element_frequency
            .get(element_type)
            .map(|f| f.total_count)
            .unwrap_or(1)
    }
}

struct TypeStats<'a> {
    first: &'a DetectedElement,
    total_count: usize,
    documents: HashSet<&'a str>,
    pages: BTreeSet<u32>,
    texts: Vec<String>,
    pii_types: Vec<PiiType>,
}

impl<'a> TypeStats<'a> {
    fn new(first: &'a DetectedElement) -> Self {
        Self {
            first,
            total_count: 0,
            documents: HashSet::new(),
            pages: BTreeSet::new(),
            texts: Vec::new(),
            pii_types: Vec::new(),
        }
    }

    fn add(&mut self, record: &'a PageRecord, element: &'a DetectedElement) {
        self.total_count += 1;
        self.documents.insert(record.doc_id.as_str());
        self.pages.insert(record.page_index);
        if let Some(text) = element.text_sample() {
            self.texts.push(text);
        }
        if !element.pii_type.is_none() && !self.pii_types.contains(&element.pii_type) {
            self.pii_types.push(element.pii_type.clone());
        }
    }
}

pub fn analyze_frequency(
    records: &[&PageRecord],
    mapper: &ElementMapper<'_>,
    thresholds: &Thresholds,
) -> FrequencyAnalysis {
    let total_documents = records
        .iter()
        .map(|r| r.doc_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let mut stats: BTreeMap<&str, TypeStats<'_>> = BTreeMap::new();
    for record in records.iter().copied() {
        for element in &record.elements {
            stats
                .entry(element.element_type.as_str())
                .or_insert_with(|| TypeStats::new(element))
                .add(record, element);
        }
    }

    let staticity = StaticityCheck::new(thresholds.similarity, thresholds.static_majority);
    let mut analysis = FrequencyAnalysis {
        total_documents,
        ..FrequencyAnalysis::default()
    };

    for (element_type, type_stats) in &stats {
        let mapped = mapper.map_one(type_stats.first);
        let document_count = type_stats.documents.len();
        let frequency = ElementFrequency {
            total_count: type_stats.total_count,
            document_count,
            document_percentage: percentage(document_count, total_documents),
            page_numbers: type_stats.pages.iter().copied().collect(),
            mapping_status: mapped.mapping_status,
            category: mapped
                .field_schema
                .category
                .clone()
                .unwrap_or_else(|| CUSTOM_CATEGORY.to_string()),
            is_static: staticity.is_static(&type_stats.texts),
            pii_types: type_stats.pii_types.clone(),
            content_samples: type_stats
                .texts
                .iter()
                .filter(|t| !t.trim().is_empty())
                .take(MAX_CONTENT_SAMPLES)
                .cloned()
                .collect(),
        };

        if frequency.document_percentage >= thresholds.common_element_percentage {
            analysis.common_elements.push(CommonElement {
                element_type: mapped.field_schema.field_id.clone(),
                source_type: element_type.to_string(),
                category: frequency.category.clone(),
                frequency_percentage: frequency.document_percentage,
                appears_in_documents: document_count,
                mapping_status: mapped.mapping_status,
                catalog_definition: mapped.definition.cloned(),
                field_schema: mapped.field_schema.clone(),
                content_analysis: ContentAnalysis {
                    is_static: frequency.is_static,
                    sample_content: frequency.content_samples.clone(),
                    pii_detected: frequency.pii_types.clone(),
                },
            });
        }

        if document_count == total_documents {
            if let Some(pii_type) = frequency.pii_types.first() {
                analysis.document_fields.push(DocumentField {
                    field_id: mapped.field_schema.field_id.clone(),
                    label: mapped.field_schema.label.clone(),
                    data_type: mapped.field_schema.data_type.clone(),
                    pii_type: pii_type.clone(),
                    source_type: element_type.to_string(),
                    category: frequency.category.clone(),
                    sample_values: frequency.content_samples.clone(),
                });
            }
        }

        analysis
            .element_frequency
            .insert(element_type.to_string(), frequency);
    }

    // Stable sort keeps type order among equal percentages.
    analysis.common_elements.sort_by(|a, b| {
        b.frequency_percentage
            .total_cmp(&a.frequency_percentage)
    });

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRegistry;
    use serde_json::json;

    fn registry() -> CatalogRegistry {
        CatalogRegistry::from_value(&json!({
            "sections": {
                "document_identity_and_metadata": {
                    "company": {
                        "field_id": "company_name",
                        "label": "Company Name",
                        "pii_type": "ORG_NAME"
                    }
                }
            }
        }))
        .unwrap()
    }

    fn records() -> Vec<PageRecord> {
        vec![
            PageRecord::new(
                "doc1",
                1,
                vec![
                    DetectedElement::new("company_name")
                        .with_text("Acme Corp")
                        .with_pii(PiiType::OrgName),
                    DetectedElement::new("footer").with_text("Confidential"),
                ],
            ),
            PageRecord::new(
                "doc1",
                2,
                vec![DetectedElement::new("footer").with_text("Confidential")],
            ),
            PageRecord::new(
                "doc2",
                1,
                vec![
                    DetectedElement::new("company_name")
                        .with_text("Globex")
                        .with_pii(PiiType::OrgName),
                    DetectedElement::new("footer").with_text("Confidential"),
                ],
            ),
            PageRecord::new(
                "doc3",
                1,
                vec![
                    DetectedElement::new("company_name")
                        .with_text("Initech")
                        .with_pii(PiiType::OrgName),
                    DetectedElement::new("revenue_chart"),
                ],
            ),
        ]
    }

    fn analyze(records: &[PageRecord], registry: &CatalogRegistry) -> FrequencyAnalysis {
        let records: Vec<&PageRecord> = records.iter().collect();
        analyze_frequency(&records, &ElementMapper::new(registry), &Thresholds::default())
    }

    #[test]
    fn test_counts_and_percentages() {
        let registry = registry();
        let records = records();
        let analysis = analyze(&records, &registry);

        assert_eq!(analysis.total_documents, 3);
        let footer = &analysis.element_frequency["footer"];
        assert_eq!(footer.total_count, 3);
        assert_eq!(footer.document_count, 2);
        assert_eq!(footer.document_percentage, 66.7);
        assert_eq!(footer.page_numbers, [1, 2]);
        assert!(footer.is_static);
        assert_eq!(footer.mapping_status, MappingStatus::Unmapped);
        assert_eq!(footer.category, "custom");

        let chart = &analysis.element_frequency["revenue_chart"];
        assert_eq!(chart.document_percentage, 33.3);
        assert!(chart.content_samples.is_empty());
    }

    #[test]
    fn test_company_name_is_a_document_field() {
        let registry = registry();
        let records = records();
        let analysis = analyze(&records, &registry);

        let company = &analysis.element_frequency["company_name"];
        assert_eq!(company.mapping_status, MappingStatus::Mapped);
        assert!(!company.is_static);
        assert_eq!(company.pii_types, [PiiType::OrgName]);
        assert_eq!(company.content_samples, ["Acme Corp", "Globex", "Initech"]);

        assert_eq!(analysis.document_fields.len(), 1);
        let field = &analysis.document_fields[0];
        assert_eq!(field.field_id, "company_name");
        assert_eq!(field.label, "Company Name");
        assert_eq!(field.pii_type, PiiType::OrgName);
        assert_eq!(field.category, "document_identity_and_metadata");
    }

    #[test]
    fn test_common_elements_sorted_by_percentage() {
        let registry = registry();
        let records = records();
        let analysis = analyze(&records, &registry);

        let types: Vec<&str> = analysis
            .common_elements
            .iter()
            .map(|c| c.source_type.as_str())
            .collect();
        assert_eq!(types, ["company_name", "footer"]);

        let company = &analysis.common_elements[0];
        assert!(company.catalog_definition.is_some());
        assert_eq!(company.frequency_percentage, 100.0);

        let footer = &analysis.common_elements[1];
        assert_eq!(footer.element_type, "custom_footer");
        assert!(footer.catalog_definition.is_none());
    }

    #[test]
    fn test_unknown_type_counts_as_always_present() {
        let analysis = FrequencyAnalysis::default();
        assert_eq!(analysis.document_percentage("missing"), 100.0);
        assert_eq!(analysis.total_occurrences("missing"), 1);
    }

    #[test]
    fn test_empty_input() {
        let registry = CatalogRegistry::empty();
        let analysis = analyze(&[], &registry);
        assert_eq!(analysis.total_documents, 0);
        assert!(analysis.element_frequency.is_empty());
        assert!(analysis.document_fields.is_empty());
    }
}
