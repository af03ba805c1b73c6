//! Bounded-concurrency fan-out of page extraction calls.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::catalog::CatalogRegistry;
use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::extraction::prompt::{build_page_prompt, build_system_prompt};
use crate::extraction::response::ResponseParser;
use crate::extraction::{CompletionRequest, PageExtractor};
use crate::record::PageRecord;
use crate::sanitize::{hash_text, preview_text};
use crate::source::SourceDocument;

const PREVIEW_CHARS: usize = 40;

pub struct ExtractionRunner {
    extractor: Arc<dyn PageExtractor>,
    catalog: Arc<CatalogRegistry>,
    concurrency: usize,
    max_tokens: u32,
}

impl ExtractionRunner {
    pub fn new(
        extractor: Arc<dyn PageExtractor>,
        catalog: Arc<CatalogRegistry>,
        config: &ExtractionConfig,
    ) -> Self {
        Self {
            extractor,
            catalog,
            concurrency: config.concurrency.max(1),
            max_tokens: config.max_tokens,
        }
    }

    /// Extracts every page of every document.
    ///
    /// Records come back in document order, then page order. Pages whose
    /// call or response fails are logged and left out.
    pub async fn extract_documents(
        &self,
        documents: &[SourceDocument],
    ) -> Result<Vec<PageRecord>, ExtractionError> {
        let parser = ResponseParser::new()?;
        let system_prompt = build_system_prompt(&self.catalog);
        let total_pages: usize = documents.iter().map(|d| d.pages.len()).sum();

        let span = info_span!(
            "extraction",
            documents = documents.len(),
            pages = total_pages,
            concurrency = self.concurrency
        );

        let jobs = documents.iter().flat_map(|doc| {
            doc.pages
                .iter()
                .enumerate()
                .map(move |(i, text)| (doc.doc_id.as_str(), i as u32 + 1, text.as_str()))
        });

        let results: Vec<Option<PageRecord>> = stream::iter(jobs)
            .map(|(doc_id, page_index, text)| {
                let system_prompt = system_prompt.as_str();
                let parser = &parser;
                async move {
                    match self
                        .extract_page(system_prompt, parser, doc_id, page_index, text)
                        .await
                    {
                        Ok(record) => Some(record),
                        Err(e) => {
                            warn!(
                                doc_id,
                                page_index,
                                page = %preview_text(text, PREVIEW_CHARS),
                                error = %e,
                                "Page extraction failed, skipping"
                            );
                            None
                        }
                    }
                }
            })
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .instrument(span)
            .await;

        let records: Vec<PageRecord> = results.into_iter().flatten().collect();
        info!(
            extracted = records.len(),
            failed = total_pages - records.len(),
            "Extraction finished"
        );
        Ok(records)
    }

    async fn extract_page(
        &self,
        system_prompt: &str,
        parser: &ResponseParser,
        doc_id: &str,
        page_index: u32,
        text: &str,
    ) -> Result<PageRecord, ExtractionError> {
        debug!(doc_id, page_index, text_hash = %hash_text(text), "Requesting page extraction");

        let request = CompletionRequest {
            system_prompt: system_prompt.to_string(),
            user_prompt: build_page_prompt(text, doc_id, page_index),
            max_tokens: self.max_tokens,
        };
        let raw = self.extractor.complete(&request).await?;
        parser.parse(&raw, doc_id, page_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers with one element echoing the page's first line; pages
    /// containing "FAIL" produce a provider error.
    struct EchoExtractor {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl EchoExtractor {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PageExtractor for EchoExtractor {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, ExtractionError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if request.user_prompt.contains("FAIL") {
                return Err(ExtractionError::Provider("throttled".to_string()));
            }
            let first_line = request
                .user_prompt
                .lines()
                .skip_while(|l| !l.starts_with("PAGE CONTENT:"))
                .nth(1)
                .unwrap_or_default();
            Ok(format!(
                "```json\n{{\"elements\": [{{\"type\": \"title\", \"text\": \"{}\"}}]}}\n```",
                first_line
            ))
        }
    }

    fn document(doc_id: &str, pages: &[&str]) -> SourceDocument {
        SourceDocument {
            doc_id: doc_id.to_string(),
            pages: pages.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn runner(extractor: Arc<EchoExtractor>, concurrency: usize) -> ExtractionRunner {
        let config = ExtractionConfig {
            concurrency,
            ..ExtractionConfig::default()
        };
        ExtractionRunner::new(extractor, Arc::new(CatalogRegistry::empty()), &config)
    }

    #[tokio::test]
    async fn test_records_keep_document_and_page_order() {
        let extractor = Arc::new(EchoExtractor::new());
        let runner = runner(extractor.clone(), 3);
        let docs = vec![
            document("a", &["Cover A", "Summary A"]),
            document("b", &["Cover B", "Summary B", "Contact B"]),
        ];

        let records = runner.extract_documents(&docs).await.unwrap();
        let positions: Vec<(&str, u32)> = records
            .iter()
            .map(|r| (r.doc_id.as_str(), r.page_index))
            .collect();
        assert_eq!(positions, [("a", 1), ("a", 2), ("b", 1), ("b", 2), ("b", 3)]);
        assert_eq!(records[3].elements[0].text.as_deref(), Some("Summary B"));
        assert!(extractor.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_failed_pages_are_omitted() {
        let runner = runner(Arc::new(EchoExtractor::new()), 2);
        let docs = vec![document("a", &["Cover", "FAIL here", "Contact"])];

        let records = runner.extract_documents(&docs).await.unwrap();
        let pages: Vec<u32> = records.iter().map(|r| r.page_index).collect();
        assert_eq!(pages, [1, 3]);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped() {
        let extractor = Arc::new(EchoExtractor::new());
        let runner = runner(extractor.clone(), 0);
        let records = runner
            .extract_documents(&[document("a", &["One", "Two"])])
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(extractor.peak.load(Ordering::SeqCst), 1);
    }
}
