use serde::{Deserialize, Serialize};

/// Token-set Jaccard similarity above which two texts count as the same.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;
/// Share of the other samples that must match the first for a block to be static.
pub const DEFAULT_STATIC_MAJORITY: f64 = 0.7;
/// Page presence (percent of documents) at or above which a page is required.
pub const DEFAULT_PAGE_REQUIRED_PERCENTAGE: f64 = 50.0;
/// Element document percentage below which a block is optional.
pub const DEFAULT_BLOCK_OPTIONAL_BELOW_PERCENTAGE: f64 = 70.0;
/// Element document percentage at or above which an element is common.
pub const DEFAULT_COMMON_ELEMENT_PERCENTAGE: f64 = 50.0;
/// Heading texts at or above this length are not considered page titles.
pub const DEFAULT_TITLE_MAX_CHARS: usize = 100;
/// Highest accepted `page_index`. Mirrors `maximum` in page-record-v1.json.
pub const MAX_PAGE_INDEX: u32 = 10_000;
pub const DEFAULT_EXTRACTION_CONCURRENCY: usize = 4;
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_version")]
    pub version: String,
    /// Location of the master catalog JSON. Absent means an empty catalog.
    #[serde(default)]
    pub catalog_path: Option<String>,
    #[serde(default)]
    pub template: TemplateIdentity,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub duplicate_pages: DuplicatePagePolicy,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            catalog_path: None,
            template: TemplateIdentity::default(),
            thresholds: Thresholds::default(),
            duplicate_pages: DuplicatePagePolicy::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

/// Identifying metadata stamped on every generated template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateIdentity {
    #[serde(default = "default_template_id")]
    pub template_id: String,
    #[serde(default = "default_template_name")]
    pub name: String,
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

fn default_template_id() -> String {
    "page_number_based_master_v1".to_string()
}

fn default_template_name() -> String {
    "Page Number-Based Master Template".to_string()
}

fn default_doc_type() -> String {
    "comprehensive_document".to_string()
}

fn default_output_format() -> String {
    "pptx".to_string()
}

impl Default for TemplateIdentity {
    fn default() -> Self {
        Self {
            template_id: default_template_id(),
            name: default_template_name(),
            doc_type: default_doc_type(),
            output_format: default_output_format(),
        }
    }
}

/// Policy constants of the inference heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_similarity")]
    pub similarity: f64,
    #[serde(default = "default_static_majority")]
    pub static_majority: f64,
    #[serde(default = "default_page_required")]
    pub page_required_percentage: f64,
    #[serde(default = "default_block_optional_below")]
    pub block_optional_below_percentage: f64,
    #[serde(default = "default_common_element")]
    pub common_element_percentage: f64,
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
}

fn default_similarity() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_static_majority() -> f64 {
    DEFAULT_STATIC_MAJORITY
}

fn default_page_required() -> f64 {
    DEFAULT_PAGE_REQUIRED_PERCENTAGE
}

fn default_block_optional_below() -> f64 {
    DEFAULT_BLOCK_OPTIONAL_BELOW_PERCENTAGE
}

fn default_common_element() -> f64 {
    DEFAULT_COMMON_ELEMENT_PERCENTAGE
}

fn default_title_max_chars() -> usize {
    DEFAULT_TITLE_MAX_CHARS
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            similarity: DEFAULT_SIMILARITY_THRESHOLD,
            static_majority: DEFAULT_STATIC_MAJORITY,
            page_required_percentage: DEFAULT_PAGE_REQUIRED_PERCENTAGE,
            block_optional_below_percentage: DEFAULT_BLOCK_OPTIONAL_BELOW_PERCENTAGE,
            common_element_percentage: DEFAULT_COMMON_ELEMENT_PERCENTAGE,
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
        }
    }
}

/// What to do when one document emits several records for the same page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePagePolicy {
    /// Every record counts as its own occurrence.
    #[default]
    Keep,
    /// Only the first record per `(doc_id, page_index)` is used.
    First,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Maximum number of in-flight page extraction calls.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_concurrency() -> usize {
    DEFAULT_EXTRACTION_CONCURRENCY
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_EXTRACTION_CONCURRENCY,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Config file syntax, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}
