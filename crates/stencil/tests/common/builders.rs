//! Builders for page records without JSON boilerplate.

#![allow(dead_code)]

use stencil::record::{ChartPayload, DataPoint, ElementContent};
use stencil::{DetectedElement, PageRecord, PiiType};

/// Element of `element_type` carrying `text`.
pub fn text_element(element_type: &str, text: &str) -> DetectedElement {
    DetectedElement::new(element_type).with_text(text)
}

/// Element of `element_type` carrying `text` flagged with `pii`.
pub fn pii_element(element_type: &str, text: &str, pii: PiiType) -> DetectedElement {
    DetectedElement::new(element_type)
        .with_text(text)
        .with_pii(pii)
}

/// Chart element with one data point per `(name, value)` pair.
pub fn chart_element(element_type: &str, title: &str, points: &[(&str, &str)]) -> DetectedElement {
    let chart = ChartPayload {
        chart_type: "bar".to_string(),
        title: title.to_string(),
        data: points
            .iter()
            .map(|(name, value)| DataPoint {
                name: name.to_string(),
                value: value.to_string(),
                unit: None,
            })
            .collect(),
        ..ChartPayload::default()
    };
    DetectedElement::new(element_type)
        .with_text(title)
        .with_content(ElementContent::Chart(chart))
}

/// Builder for one document's pages, numbered from 1.
pub struct DocumentBuilder {
    doc_id: String,
    pages: Vec<Vec<DetectedElement>>,
}

impl DocumentBuilder {
    pub fn new(doc_id: &str) -> Self {
        Self {
            doc_id: doc_id.to_string(),
            pages: Vec::new(),
        }
    }

    pub fn page(mut self, elements: Vec<DetectedElement>) -> Self {
        self.pages.push(elements);
        self
    }

    pub fn build(self) -> Vec<PageRecord> {
        let doc_id = self.doc_id;
        self.pages
            .into_iter()
            .enumerate()
            .map(|(i, elements)| PageRecord::new(doc_id.clone(), i as u32 + 1, elements))
            .collect()
    }
}

/// Three company profiles, two pages each: a title page with a distinct
/// company name and an executive summary with distinct body text.
pub fn company_profiles() -> Vec<PageRecord> {
    [
        ("acme", "Acme Corp", "Acme builds rockets for desert logistics."),
        ("globex", "Globex Corporation", "Globex leads in energy trading across Europe."),
        ("initech", "Initech LLC", "Initech delivers payroll software to banks."),
    ]
    .into_iter()
    .flat_map(|(doc_id, name, summary)| {
        DocumentBuilder::new(doc_id)
            .page(vec![pii_element("title", name, PiiType::OrgName)])
            .page(vec![text_element("executive_summary_text", summary)])
            .build()
    })
    .collect()
}
