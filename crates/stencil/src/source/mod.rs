//! Page text sources feeding the extraction layer.
//!
//! Each source turns one file into an ordered list of page texts; the
//! position in that list becomes the page's ordinal.

pub mod pdf;
pub mod pptx;
pub mod text;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::sanitize::redact_path;

/// A document split into page texts, first page first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub doc_id: String,
    pub pages: Vec<String>,
}

impl SourceDocument {
    pub fn new(doc_id: impl Into<String>, pages: Vec<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Pptx,
    Text,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "pptx" => Some(Self::Pptx),
            "txt" | "text" | "md" | "markdown" => Some(Self::Text),
            _ => None,
        }
    }
}

pub trait PageSource: Send + Sync {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, SourceError>;
    fn supports(&self, format: SourceFormat) -> bool;
}

/// Text standing in for a page that yielded nothing.
pub fn empty_page_placeholder(page_number: usize) -> String {
    format!("[Page {} - No text extracted]", page_number)
}

/// Replaces blank pages with [`empty_page_placeholder`] so the page keeps
/// its ordinal.
pub(crate) fn fill_empty_pages(pages: Vec<String>) -> Vec<String> {
    pages
        .into_iter()
        .enumerate()
        .map(|(i, page)| {
            if page.trim().is_empty() {
                empty_page_placeholder(i + 1)
            } else {
                page
            }
        })
        .collect()
}

pub struct SourceRegistry {
    sources: Vec<Box<dyn PageSource>>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: vec![
                Box::new(text::TextSource::new()),
                Box::new(pdf::PdfSource::new()),
                Box::new(pptx::PptxSource::new()),
            ],
        }
    }

    /// Reads `path` with the source matching its extension. The file stem
    /// becomes the document id.
    pub fn load(&self, path: &Path) -> Result<SourceDocument, SourceError> {
        let _span = tracing::info_span!("source.load", file = %redact_path(path)).entered();

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let format = SourceFormat::from_extension(extension)
            .ok_or_else(|| SourceError::UnsupportedFormat(extension.to_string()))?;

        let source = self
            .sources
            .iter()
            .find(|s| s.supports(format))
            .ok_or_else(|| SourceError::UnsupportedFormat(extension.to_string()))?;

        let pages = fill_empty_pages(source.extract_pages(path)?);
        let doc_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document")
            .to_string();

        log::debug!("Loaded {} pages from {}", pages.len(), redact_path(path));
        Ok(SourceDocument::new(doc_id, pages))
    }

    /// Loads every path, skipping (and logging) files that fail.
    pub fn load_all<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<SourceDocument> {
        paths
            .iter()
            .filter_map(|path| match self.load(path.as_ref()) {
                Ok(document) => Some(document),
                Err(e) => {
                    log::warn!("Skipping {}: {}", redact_path(path.as_ref()), e);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("PDF"), Some(SourceFormat::Pdf));
        assert_eq!(SourceFormat::from_extension("pptx"), Some(SourceFormat::Pptx));
        assert_eq!(SourceFormat::from_extension("md"), Some(SourceFormat::Text));
        assert_eq!(SourceFormat::from_extension("docx"), None);
    }

    #[test]
    fn test_fill_empty_pages() {
        let pages = fill_empty_pages(vec!["Cover".into(), "  \n".into(), "Contact".into()]);
        assert_eq!(pages, ["Cover", "[Page 2 - No text extracted]", "Contact"]);
    }

    #[test]
    fn test_registry_routes_text_and_uses_file_stem() {
        let registry = SourceRegistry::new();
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        write!(file, "Acme Corp\x0cAbout us").unwrap();

        let document = registry.load(file.path()).unwrap();
        let stem = file.path().file_stem().unwrap().to_str().unwrap();
        assert_eq!(document.doc_id, stem);
        assert_eq!(document.pages, ["Acme Corp", "About us"]);
    }

    #[test]
    fn test_registry_rejects_unknown_extension() {
        let registry = SourceRegistry::new();
        let file = NamedTempFile::with_suffix(".docx").unwrap();
        let err = registry.load(file.path()).unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedFormat(ext) if ext == "docx"));
    }

    #[test]
    fn test_load_all_skips_failures() {
        let registry = SourceRegistry::new();
        let mut good = NamedTempFile::with_suffix(".md").unwrap();
        writeln!(good, "# Profile").unwrap();
        let paths = vec![
            good.path().to_path_buf(),
            std::path::PathBuf::from("/nonexistent/deck.pdf"),
        ];

        let documents = registry.load_all(&paths);
        assert_eq!(documents.len(), 1);
    }
}
