pub mod catalog;
pub mod config;
pub mod error;
pub mod extraction;
pub mod inference;
pub mod pipeline;
pub mod record;
pub mod sanitize;
pub mod source;
pub mod telemetry;
pub mod template;
pub mod util;

pub use catalog::{CatalogRegistry, CoverageReport, ElementMapper, MappingStatus};
pub use config::{load_config, DuplicatePagePolicy, InferenceConfig, Thresholds, MAX_PAGE_INDEX};
pub use error::{
    CatalogError, ConfigError, ExtractionError, IngestError, Result, SourceError, StencilError,
    TemplateError,
};
pub use extraction::{CompletionRequest, ExtractionRunner, PageExtractor};
pub use pipeline::{PipelineError, PipelineWarning, ProgressReporter, TemplateEngine};
pub use record::{parse_page_records, DetectedElement, PageRecord, PiiType};
pub use source::{SourceDocument, SourceRegistry};
pub use telemetry::{init_tracing, LogFormat};
pub use template::{read_template, write_template, MasterTemplate};
