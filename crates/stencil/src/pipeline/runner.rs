use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::catalog::{analyze_coverage, CatalogRegistry, ElementMapper};
use crate::config::{InferenceConfig, MAX_PAGE_INDEX};
use crate::extraction::{ExtractionRunner, PageExtractor};
use crate::inference::{
    analyze_frequency, classify_content_types, document_ids, group_by_ordinal, infer_page_role,
    infer_page_title, max_ordinal, select_records, BlockSynthesizer,
};
use crate::record::{parse_page_records, parse_page_records_str, PageRecord};
use crate::source::SourceDocument;
use crate::template::{
    AnalysisSummary, CatalogIntegration, DocumentStructure, MasterTemplate, TemplatePage,
};
use crate::util::percentage;

use super::context::InferenceContext;
use super::error::{PipelineError, PipelineWarning};
use super::progress::{AssemblyPhase, NoopProgress, ProgressEvent, ProgressReporter};

/// Infers a master template from page records.
///
/// Holds only read-only shared state, so one engine can serve concurrent
/// runs over different batches.
pub struct TemplateEngine {
    catalog: Arc<CatalogRegistry>,
    config: Arc<InferenceConfig>,
}

impl TemplateEngine {
    pub fn new(catalog: Arc<CatalogRegistry>, config: Arc<InferenceConfig>) -> Self {
        Self { catalog, config }
    }

    /// Production constructor: loads the catalog named by the config,
    /// falling back to an empty catalog when it is absent or unreadable.
    pub fn from_config(config: Arc<InferenceConfig>) -> Self {
        let catalog = match config.catalog_path.as_deref() {
            Some(path) => CatalogRegistry::load_or_empty(path),
            None => CatalogRegistry::empty(),
        };
        Self::new(Arc::new(catalog), config)
    }

    pub fn catalog(&self) -> &CatalogRegistry {
        &self.catalog
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn infer(&self, records: &[PageRecord]) -> Result<MasterTemplate, PipelineError> {
        let (template, _warnings) = self.infer_with_progress(records, &NoopProgress)?;
        Ok(template)
    }

    /// Validates raw JSON page records before inferring.
    pub fn infer_from_json(&self, value: &Value) -> Result<MasterTemplate, PipelineError> {
        let records = parse_page_records(value)?;
        self.infer(&records)
    }

    pub fn infer_from_str(&self, content: &str) -> Result<MasterTemplate, PipelineError> {
        let records = parse_page_records_str(content)?;
        self.infer(&records)
    }

    /// Extracts every page through `extractor`, then infers from the
    /// records that came back.
    pub async fn infer_from_documents(
        &self,
        extractor: Arc<dyn PageExtractor>,
        documents: &[SourceDocument],
    ) -> Result<MasterTemplate, PipelineError> {
        let runner = ExtractionRunner::new(extractor, self.catalog.clone(), &self.config.extraction);
        let records = runner.extract_documents(documents).await?;
        self.infer(&records)
    }

    /// Runs every step to completion; there is no partial output.
    ///
    /// Fails only when a record's `page_index` is above [`MAX_PAGE_INDEX`].
    /// Non-fatal degradations come back next to the template.
    pub fn infer_with_progress(
        &self,
        records: &[PageRecord],
        progress: &dyn ProgressReporter,
    ) -> Result<(MasterTemplate, Vec<PipelineWarning>), PipelineError> {
        if let Some(record) = records.iter().find(|r| r.page_index > MAX_PAGE_INDEX) {
            return Err(PipelineError::PageIndexOutOfRange {
                doc_id: record.doc_id.clone(),
                page_index: record.page_index,
                max: MAX_PAGE_INDEX,
            });
        }

        let mut ctx = InferenceContext::new(Uuid::new_v4().to_string(), records);
        let template = self.run(&mut ctx, progress);
        Ok((template, std::mem::take(&mut ctx.warnings)))
    }

    fn run<'a>(
        &'a self,
        ctx: &mut InferenceContext<'a>,
        progress: &dyn ProgressReporter,
    ) -> MasterTemplate {
        let documents = document_ids(ctx.records).len();
        let _inference_span = info_span!("inference",
            run_id = %ctx.run_id,
            documents,
            records = ctx.records.len(),
        )
        .entered();

        progress.report(ProgressEvent::Phase {
            phase: AssemblyPhase::Init,
            message: format!(
                "Inferring template from {} records of {} documents",
                ctx.records.len(),
                documents
            ),
        });
        if ctx.records.is_empty() {
            warn!("No page records supplied, producing an empty template");
            ctx.warnings.push(PipelineWarning::EmptyInput);
        }

        let selected = select_records(ctx.records, self.config.duplicate_pages);

        // Step 1: Map detected elements onto the catalog
        {
            let _step = info_span!("mapping").entered();
            progress.report(ProgressEvent::Phase {
                phase: AssemblyPhase::Mapping,
                message: "Mapping detected elements to the catalog...".to_string(),
            });
            self.step_mapping(ctx, &selected);
        }

        // Step 2: Coverage
        {
            let _step = info_span!("coverage").entered();
            progress.report(ProgressEvent::Phase {
                phase: AssemblyPhase::Coverage,
                message: "Analyzing catalog coverage...".to_string(),
            });
            self.step_coverage(ctx);
        }

        // Step 3: Group by ordinal and collect frequencies
        {
            let _step = info_span!("grouping").entered();
            progress.report(ProgressEvent::Phase {
                phase: AssemblyPhase::Grouping,
                message: "Grouping pages by page number...".to_string(),
            });
            self.step_grouping(ctx, &selected);
        }

        // Step 4: One template page per ordinal
        {
            let _step = info_span!("page_synthesis", max_ordinal = ctx.max_ordinal).entered();
            progress.report(ProgressEvent::Phase {
                phase: AssemblyPhase::PageSynthesis,
                message: format!("Synthesizing {} pages...", ctx.max_ordinal),
            });
            self.step_page_synthesis(ctx, progress);
        }

        // Step 5: Assemble
        let template = {
            let _step = info_span!("assembly").entered();
            progress.report(ProgressEvent::Phase {
                phase: AssemblyPhase::Assembly,
                message: "Assembling master template...".to_string(),
            });
            self.step_assembly(ctx)
        };

        info!(
            total_pages = template.total_pages,
            coverage = template.catalog_integration.coverage_analysis.coverage_percentage,
            warnings = ctx.warnings.len(),
            "Master template inferred"
        );
        progress.report(ProgressEvent::Completed {
            total_pages: template.total_pages,
            coverage_percentage: template.catalog_integration.coverage_analysis.coverage_percentage,
        });

        template
    }

    fn step_mapping<'a>(&'a self, ctx: &mut InferenceContext<'a>, selected: &[&'a PageRecord]) {
        let mapper = ElementMapper::new(&self.catalog);
        ctx.mapped = mapper.map(
            selected
                .iter()
                .copied()
                .flat_map(|record| record.elements.iter()),
        );
        debug!(elements = ctx.mapped.len(), "Mapped detected elements");
    }

    fn step_coverage(&self, ctx: &mut InferenceContext<'_>) {
        ctx.coverage = analyze_coverage(&ctx.mapped, self.catalog.len());

        if ctx.coverage.total_detected > 0 && ctx.coverage.mapped_count == 0 {
            warn!(
                detected = ctx.coverage.total_detected,
                "No detected element matched the catalog, every field is custom"
            );
            ctx.warnings.push(PipelineWarning::NoCatalogMatches {
                detected: ctx.coverage.total_detected,
            });
        }
    }

    fn step_grouping<'a>(&'a self, ctx: &mut InferenceContext<'a>, selected: &[&'a PageRecord]) {
        ctx.groups = group_by_ordinal(selected.iter().copied());
        ctx.max_ordinal = max_ordinal(selected.iter().copied());
        ctx.frequency = analyze_frequency(
            selected,
            &ElementMapper::new(&self.catalog),
            &self.config.thresholds,
        );
        debug!(
            ordinals = ctx.groups.len(),
            max_ordinal = ctx.max_ordinal,
            element_types = ctx.frequency.element_frequency.len(),
            "Grouped pages"
        );
    }

    fn step_page_synthesis(&self, ctx: &mut InferenceContext<'_>, progress: &dyn ProgressReporter) {
        let thresholds = &self.config.thresholds;
        let synthesizer = BlockSynthesizer::new(&ctx.frequency, thresholds);
        let total_documents = ctx.frequency.total_documents;
        let mut pages = Vec::new();

        for page_number in 1..=ctx.max_ordinal {
            let group = ctx
                .groups
                .get(&page_number)
                .map(Vec::as_slice)
                .unwrap_or_default();
            if group.is_empty() {
                debug!(page = page_number, "No records for page, emitting an empty optional page");
                ctx.warnings.push(PipelineWarning::EmptyPage { page_number });
            }

            let page_role = infer_page_role(group, page_number);
            let document_count = group.len();
            let frequency_percentage =
                percentage(document_count.min(total_documents), total_documents);
            let page = TemplatePage {
                page_number,
                page_title: infer_page_title(group, page_number, page_role, thresholds.title_max_chars),
                page_role,
                content_types: classify_content_types(group),
                required: frequency_percentage >= thresholds.page_required_percentage,
                frequency_percentage,
                document_count,
                blocks: synthesizer.synthesize(page_number, group),
            };

            debug!(
                page = page_number,
                role = page.page_role.as_str(),
                blocks = page.blocks.len(),
                required = page.required,
                "Synthesized page"
            );
            progress.report(ProgressEvent::PageSynthesized {
                page_number,
                max_page_number: ctx.max_ordinal,
                blocks: page.blocks.len(),
            });
            pages.push(page);
        }

        ctx.pages = pages;
    }

    fn step_assembly(&self, ctx: &mut InferenceContext<'_>) -> MasterTemplate {
        let identity = &self.config.template;
        let metadata = self.catalog.metadata();
        let total_documents = ctx.frequency.total_documents;

        let mut page_distribution: BTreeMap<String, usize> = BTreeMap::new();
        for record in ctx.records {
            *page_distribution.entry(record.doc_id.clone()).or_default() += 1;
        }

        let pages = std::mem::take(&mut ctx.pages);
        let frequency = std::mem::take(&mut ctx.frequency);

        MasterTemplate {
            template_id: identity.template_id.clone(),
            name: identity.name.clone(),
            description: format!(
                "Master template built from {} documents using page number approach",
                total_documents
            ),
            doc_type: identity.doc_type.clone(),
            output_format: identity.output_format.clone(),
            generated_at: Utc::now(),
            catalog_integration: CatalogIntegration {
                catalog_id: metadata.template_id.clone(),
                catalog_version: metadata.version.clone(),
                catalog_name: metadata.name.clone(),
                coverage_analysis: ctx.coverage.clone(),
                mapped_elements: ctx.coverage.mapped_count,
                unmapped_elements: ctx.coverage.unmapped_count,
            },
            analysis_summary: AnalysisSummary {
                total_documents,
                total_pages: ctx.records.len(),
                common_elements: frequency.common_elements.len(),
                unique_elements: frequency.element_frequency.len(),
                document_structure: DocumentStructure { page_distribution },
            },
            document_fields: frequency.document_fields,
            common_elements: frequency.common_elements,
            element_frequency: frequency.element_frequency,
            total_pages: pages.len(),
            max_page_number: ctx.max_ordinal,
            pages,
        }
    }
}
