pub mod element;
pub mod ingest;

use serde::{Deserialize, Serialize};

pub use element::{
    ChartPayload, DataPoint, DetectedElement, ElementContent, FigurePayload, PiiType, TablePayload,
};
pub use ingest::{parse_page_records, parse_page_records_str, PageRecordValidator};

/// One page of one document as returned by the extraction layer.
///
/// `page_index` is document-local: page 3 of one document and page 3 of
/// another are aligned only by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub doc_id: String,
    pub page_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_role: Option<String>,
    pub elements: Vec<DetectedElement>,
}

impl PageRecord {
    pub fn new(doc_id: impl Into<String>, page_index: u32, elements: Vec<DetectedElement>) -> Self {
        Self {
            doc_id: doc_id.into(),
            page_index,
            page_role: None,
            elements,
        }
    }
}
