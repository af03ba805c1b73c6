use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CoverageReport;
use crate::inference::frequency::{CommonElement, DocumentField, ElementFrequency};
use crate::record::{ChartPayload, FigurePayload, PiiType};

/// Fillable field definition attached to dynamic blocks and mapped elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub field_id: String,
    pub label: String,
    pub data_type: String,
    pub required: bool,
    pub pii_type: PiiType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    Static,
    Dynamic,
}

/// Content category present on a page. Variants are declared in
/// alphabetical order so the derived ordering is lexicographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTypeTag {
    Charts,
    Figures,
    Headings,
    Lists,
    Summary,
    Tables,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageRole {
    CoverIntroduction,
    ExecutiveSummary,
    FinancialAnalysis,
    DataVisualization,
    ContactInformation,
    TabularData,
    DetailedContent,
    MixedContent,
}

impl PageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageRole::CoverIntroduction => "cover_introduction",
            PageRole::ExecutiveSummary => "executive_summary",
            PageRole::FinancialAnalysis => "financial_analysis",
            PageRole::DataVisualization => "data_visualization",
            PageRole::ContactInformation => "contact_information",
            PageRole::TabularData => "tabular_data",
            PageRole::DetailedContent => "detailed_content",
            PageRole::MixedContent => "mixed_content",
        }
    }

    /// Title used when no heading on the page qualifies.
    pub fn fallback_title(&self, page_number: u32) -> String {
        match self {
            PageRole::CoverIntroduction => "Cover Page".to_string(),
            PageRole::ExecutiveSummary => "Executive Summary".to_string(),
            PageRole::FinancialAnalysis => "Financial Analysis".to_string(),
            PageRole::DataVisualization => "Performance Metrics".to_string(),
            PageRole::ContactInformation => "Contact Information".to_string(),
            PageRole::TabularData => "Data Tables".to_string(),
            PageRole::DetailedContent => "Detailed Information".to_string(),
            PageRole::MixedContent => format!("Page {} Content", page_number),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyInfo {
    pub document_percentage: f64,
    pub total_occurrences: usize,
}

/// One synthesized content unit of a template page.
///
/// Exactly one of `static_text` and `field_schema` is set, matching
/// `content_mode`. Build through [`TemplateBlock::fixed`] or
/// [`TemplateBlock::fillable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateBlock {
    pub block_id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub description: String,
    pub content_mode: ContentMode,
    pub optional: bool,
    pub frequency_info: FrequencyInfo,
    pub static_text: Option<String>,
    pub field_schema: Option<FieldSchema>,
    pub chart_data: Option<ChartPayload>,
    pub figure_data: Option<FigurePayload>,
}

impl TemplateBlock {
    pub fn fixed(
        block_id: String,
        block_type: String,
        optional: bool,
        frequency_info: FrequencyInfo,
        static_text: String,
    ) -> Self {
        Self {
            block_id,
            block_type,
            description: String::new(),
            content_mode: ContentMode::Static,
            optional,
            frequency_info,
            static_text: Some(static_text),
            field_schema: None,
            chart_data: None,
            figure_data: None,
        }
    }

    pub fn fillable(
        block_id: String,
        block_type: String,
        optional: bool,
        frequency_info: FrequencyInfo,
        field_schema: FieldSchema,
    ) -> Self {
        Self {
            block_id,
            block_type,
            description: String::new(),
            content_mode: ContentMode::Dynamic,
            optional,
            frequency_info,
            static_text: None,
            field_schema: Some(field_schema),
            chart_data: None,
            figure_data: None,
        }
    }

    /// Whether the static/dynamic payload matches `content_mode`.
    pub fn is_consistent(&self) -> bool {
        match self.content_mode {
            ContentMode::Static => self.static_text.is_some() && self.field_schema.is_none(),
            ContentMode::Dynamic => self.static_text.is_none() && self.field_schema.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatePage {
    pub page_number: u32,
    pub page_title: String,
    pub page_role: PageRole,
    pub content_types: Vec<ContentTypeTag>,
    pub required: bool,
    pub frequency_percentage: f64,
    pub document_count: usize,
    pub blocks: Vec<TemplateBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogIntegration {
    pub catalog_id: String,
    pub catalog_version: String,
    pub catalog_name: String,
    pub coverage_analysis: CoverageReport,
    pub mapped_elements: usize,
    pub unmapped_elements: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    /// doc_id to the number of page records it contributed.
    pub page_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_documents: usize,
    pub total_pages: usize,
    pub common_elements: usize,
    pub unique_elements: usize,
    pub document_structure: DocumentStructure,
}

/// Root aggregate of one inference run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterTemplate {
    pub template_id: String,
    pub name: String,
    pub description: String,
    pub doc_type: String,
    pub output_format: String,
    pub generated_at: DateTime<Utc>,
    pub catalog_integration: CatalogIntegration,
    pub analysis_summary: AnalysisSummary,
    pub document_fields: Vec<DocumentField>,
    pub common_elements: Vec<CommonElement>,
    pub element_frequency: BTreeMap<String, ElementFrequency>,
    pub pages: Vec<TemplatePage>,
    pub total_pages: usize,
    pub max_page_number: u32,
}

impl MasterTemplate {
    pub fn page(&self, page_number: u32) -> Option<&TemplatePage> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Block ids of every page, in page order.
    pub fn block_ids(&self) -> Vec<&str> {
        self.pages
            .iter()
            .flat_map(|p| p.blocks.iter().map(|b| b.block_id.as_str()))
            .collect()
    }
}
