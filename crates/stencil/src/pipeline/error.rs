use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid inference input: {0}")]
    Ingest(#[from] crate::error::IngestError),

    #[error("Page extraction failed: {0}")]
    Extraction(#[from] crate::error::ExtractionError),

    #[error("Page {page_index} of '{doc_id}' exceeds the maximum page index {max}")]
    PageIndexOutOfRange {
        doc_id: String,
        page_index: u32,
        max: u32,
    },
}

/// Degradations recorded during a run that do not stop it. Returned next
/// to the template by [`TemplateEngine::infer_with_progress`].
///
/// [`TemplateEngine::infer_with_progress`]: super::TemplateEngine::infer_with_progress
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineWarning {
    EmptyInput,
    NoCatalogMatches { detected: usize },
    EmptyPage { page_number: u32 },
}
