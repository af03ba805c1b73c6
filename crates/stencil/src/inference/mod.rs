//! Heuristics that turn aligned page records into template pages.

pub mod aggregator;
pub mod classifier;
pub mod frequency;
pub mod similarity;
pub mod synthesizer;

pub use aggregator::{document_ids, group_by_ordinal, max_ordinal, select_records, OrdinalGroups};
pub use classifier::{classify_content_types, infer_page_role, infer_page_title};
pub use frequency::{
    analyze_frequency, CommonElement, ContentAnalysis, DocumentField, ElementFrequency,
    FrequencyAnalysis,
};
pub use similarity::{jaccard_similarity, StaticityCheck};
pub use synthesizer::BlockSynthesizer;
