use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StencilError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

/// Failure to load the reference catalog. Callers that must not fail use
/// [`crate::catalog::CatalogRegistry::load_or_empty`].
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in catalog: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Invalid catalog structure: {message}")]
    InvalidStructure { message: String },
}

/// Structural violation in the per-page input handed to the engine.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Page records must be a JSON array, got {found}")]
    NotAnArray { found: String },

    #[error("Invalid page record #{index} (doc_id: {}): {reason}", doc_id.as_deref().unwrap_or("<missing>"))]
    InvalidPageRecord {
        index: usize,
        doc_id: Option<String>,
        reason: String,
    },

    #[error("Failed to parse page records JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Page record schema unavailable: {message}")]
    Schema { message: String },
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to process PDF: {0}")]
    PdfProcessing(String),

    #[error("Failed to process PPTX: {0}")]
    PptxProcessing(String),
}

/// Per-page extraction failure. The affected page is dropped from the
/// record list; the engine never sees it.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("LLM provider failed: {0}")]
    Provider(String),

    #[error("LLM returned an empty response")]
    EmptyResponse,

    #[error("Failed to parse response for {doc_id} page {page_index}: {source}")]
    ParseResponse {
        doc_id: String,
        page_index: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("Extracted record for {doc_id} page {page_index} rejected: {reason}")]
    InvalidRecord {
        doc_id: String,
        page_index: u32,
        reason: String,
    },

    #[error("Page record schema unavailable: {0}")]
    Schema(#[from] IngestError),
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to serialize template: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to deserialize template: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("Failed to write template file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read template file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StencilError>;
