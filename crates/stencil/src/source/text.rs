use std::path::Path;

use crate::error::SourceError;
use crate::source::{PageSource, SourceFormat};

/// Plain text and Markdown. Form feeds separate pages; a file without
/// them is a single page.
pub struct TextSource;

impl TextSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for TextSource {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|e| SourceError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(split_pages(&text))
    }

    fn supports(&self, format: SourceFormat) -> bool {
        matches!(format, SourceFormat::Text)
    }
}

fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split('\x0c').map(|p| p.trim().to_string()).collect();
    // A trailing form feed does not open another page.
    if pages.len() > 1 && pages.last().is_some_and(|p| p.is_empty()) {
        pages.pop();
    }
    pages
}
