use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::SourceError;
use crate::source::{PageSource, SourceFormat};

/// One `SLIDE n:` blob per slide: shape text first, then table rows with
/// cells joined by ` | `.
pub struct PptxSource;

impl PptxSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PptxSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for PptxSource {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, SourceError> {
        let _span = tracing::info_span!("source.pptx").entered();

        let file = std::fs::File::open(path).map_err(|e| SourceError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| SourceError::PptxProcessing(format!("Failed to open PPTX: {}", e)))?;

        extract_slides(&mut archive)
    }

    fn supports(&self, format: SourceFormat) -> bool {
        matches!(format, SourceFormat::Pptx)
    }
}

/// Slide parts sorted by their number (`slide2.xml` before `slide10.xml`).
fn slide_entries<R: Read + Seek>(archive: &zip::ZipArchive<R>) -> Vec<(u32, String)> {
    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = name
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?
                .parse::<u32>()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort();
    slides
}

fn extract_slides<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> Result<Vec<String>, SourceError> {
    let entries = slide_entries(archive);
    let mut slides = Vec::with_capacity(entries.len());

    for (position, (_, name)) in entries.iter().enumerate() {
        let mut entry = archive
            .by_name(name)
            .map_err(|e| SourceError::PptxProcessing(format!("Failed to open {}: {}", name, e)))?;

        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(|e| SourceError::PptxProcessing(format!("Failed to read {}: {}", name, e)))?;

        let body = parse_slide_xml(&xml)?;
        slides.push(format!("SLIDE {}:\n{}", position + 1, body));
    }

    Ok(slides)
}

#[derive(Default)]
struct SlideText {
    out: String,
    shape: Option<String>,
    row: Option<Vec<String>>,
    cell: Option<String>,
    in_run_text: bool,
}

impl SlideText {
    fn target(&mut self) -> Option<&mut String> {
        if let Some(cell) = self.cell.as_mut() {
            return Some(cell);
        }
        self.shape.as_mut()
    }

    fn push_text(&mut self, text: &str) {
        if self.in_run_text {
            if let Some(target) = self.target() {
                target.push_str(text);
            }
        }
    }

    fn end_paragraph(&mut self) {
        if let Some(target) = self.target() {
            target.push('\n');
        }
    }

    fn end_shape(&mut self) {
        if let Some(shape) = self.shape.take() {
            let text = shape.trim();
            if !text.is_empty() {
                self.out.push_str(text);
                self.out.push('\n');
            }
        }
    }

    fn end_cell(&mut self) {
        if let (Some(cell), Some(row)) = (self.cell.take(), self.row.as_mut()) {
            row.push(cell.split_whitespace().collect::<Vec<_>>().join(" "));
        }
    }

    fn end_row(&mut self) {
        if let Some(row) = self.row.take() {
            self.out.push_str(&row.join(" | "));
            self.out.push('\n');
        }
    }
}

fn parse_slide_xml(xml: &str) -> Result<String, SourceError> {
    let mut reader = Reader::from_str(xml);
    let mut slide = SlideText::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"sp" => slide.shape = Some(String::new()),
                b"t" => slide.in_run_text = true,
                b"tbl" => slide.out.push_str("\nTABLE:\n"),
                b"tr" => slide.row = Some(Vec::new()),
                b"tc" => slide.cell = Some(String::new()),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"br" {
                    slide.end_paragraph();
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => slide.in_run_text = false,
                b"p" => slide.end_paragraph(),
                b"sp" => slide.end_shape(),
                b"tc" => slide.end_cell(),
                b"tr" => slide.end_row(),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                let decoded = e.decode().unwrap_or_default();
                slide.push_text(&decoded);
            }
            Ok(Event::GeneralRef(e)) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    slide.push_text(ch.encode_utf8(&mut [0u8; 4]));
                } else if let Ok(name) = e.decode() {
                    if let Some(resolved) = quick_xml::escape::resolve_predefined_entity(&name) {
                        slide.push_text(resolved);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SourceError::PptxProcessing(format!(
                    "XML parsing error: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(slide.out)
}
