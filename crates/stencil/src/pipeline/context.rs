use crate::catalog::{CoverageReport, MappedElement};
use crate::inference::{FrequencyAnalysis, OrdinalGroups};
use crate::record::PageRecord;
use crate::template::TemplatePage;

use super::error::PipelineWarning;

/// State carried between the steps of one inference run.
pub struct InferenceContext<'a> {
    // Input
    pub run_id: String,
    pub records: &'a [PageRecord],

    // Mapping result
    pub mapped: Vec<MappedElement<'a>>,

    // Coverage result, empty report until the coverage step runs
    pub coverage: CoverageReport,

    // Grouping results
    pub groups: OrdinalGroups<'a>,
    pub max_ordinal: u32,
    pub frequency: FrequencyAnalysis,

    // Per-page synthesis result, ordered by page number
    pub pages: Vec<TemplatePage>,

    // Non-fatal warnings
    pub warnings: Vec<PipelineWarning>,
}

impl<'a> InferenceContext<'a> {
    pub fn new(run_id: String, records: &'a [PageRecord]) -> Self {
        Self {
            run_id,
            records,
            mapped: Vec::new(),
            coverage: CoverageReport::default(),
            groups: OrdinalGroups::new(),
            max_ordinal: 0,
            frequency: FrequencyAnalysis::default(),
            pages: Vec::new(),
            warnings: Vec::new(),
        }
    }
}
