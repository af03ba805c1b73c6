use std::path::Path;

use crate::error::SourceError;
use crate::source::{PageSource, SourceFormat};

/// One text blob per PDF page, in page order.
pub struct PdfSource;

impl PdfSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for PdfSource {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, SourceError> {
        let _span = tracing::info_span!("source.pdf").entered();

        let pdf_bytes = std::fs::read(path).map_err(|e| SourceError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        let doc = lopdf::Document::load_mem(&pdf_bytes)
            .map_err(|e| SourceError::PdfProcessing(format!("Failed to load PDF: {}", e)))?;

        Ok(extract_page_texts(&doc))
    }

    fn supports(&self, format: SourceFormat) -> bool {
        matches!(format, SourceFormat::Pdf)
    }
}

/// Pages whose text cannot be decoded come back empty and are later
/// replaced by the placeholder.
fn extract_page_texts(doc: &lopdf::Document) -> Vec<String> {
    doc.get_pages()
        .keys()
        .map(|&page_num| match doc.extract_text(&[page_num]) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                log::warn!("Failed to extract text from PDF page {}: {}", page_num, e);
                String::new()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fill_empty_pages;
    use lopdf::{dictionary, Document, Object, Stream};
    use tempfile::NamedTempFile;

    /// Builds a PDF with one page per entry; `None` yields a page with an
    /// empty content stream.
    fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let content = match page {
                Some(text) => format!("BT /F1 12 Tf 50 700 Td ({}) Tj ET", text),
                None => String::new(),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => resources_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".pdf").unwrap();
        std::io::Write::write_all(&mut file, bytes).unwrap();
        file
    }

    #[test]
    fn test_supports_pdf_format() {
        let source = PdfSource::new();
        assert!(source.supports(SourceFormat::Pdf));
        assert!(!source.supports(SourceFormat::Pptx));
        assert!(!source.supports(SourceFormat::Text));
    }

    #[test]
    fn test_one_text_per_page() {
        let file = write_temp(&build_pdf(&[Some("Acme Corp Profile"), None, Some("Contact")]));

        let pages = PdfSource::new().extract_pages(file.path()).unwrap();
        assert_eq!(pages.len(), 3);
        assert!(pages[0].contains("Acme Corp Profile"));
        assert!(pages[2].contains("Contact"));

        let filled = fill_empty_pages(pages);
        assert_eq!(filled[1], "[Page 2 - No text extracted]");
    }

    #[test]
    fn test_corrupted_pdf_error() {
        let file = write_temp(b"not a valid pdf content");
        let result = PdfSource::new().extract_pages(file.path());
        assert!(matches!(result, Err(SourceError::PdfProcessing(_))));
    }

    #[test]
    fn test_pdf_file_not_found_error() {
        let result = PdfSource::new().extract_pages(Path::new("/nonexistent/profile.pdf"));
        assert!(matches!(result, Err(SourceError::ReadDocument { .. })));
    }
}
