use crate::config::Thresholds;
use crate::inference::frequency::FrequencyAnalysis;
use crate::inference::similarity::StaticityCheck;
use crate::record::{DetectedElement, PageRecord, PiiType};
use crate::template::{FieldSchema, FrequencyInfo, TemplateBlock};
use crate::util::{most_common, title_case};

/// Elements of one type pooled across an ordinal group.
struct Cluster<'a> {
    element_type: &'a str,
    elements: Vec<&'a DetectedElement>,
}

/// Turns an ordinal group into template blocks, one per element type.
pub struct BlockSynthesizer<'a> {
    frequency: &'a FrequencyAnalysis,
    thresholds: &'a Thresholds,
    staticity: StaticityCheck,
}

impl<'a> BlockSynthesizer<'a> {
    pub fn new(frequency: &'a FrequencyAnalysis, thresholds: &'a Thresholds) -> Self {
        Self {
            frequency,
            thresholds,
            staticity: StaticityCheck::new(thresholds.similarity, thresholds.static_majority),
        }
    }

    /// Blocks in first-seen type order. Clusters without any non-blank
    /// text produce no block.
    pub fn synthesize(&self, page_number: u32, group: &[&PageRecord]) -> Vec<TemplateBlock> {
        let mut blocks = Vec::new();

        for cluster in cluster_by_type(group) {
            let counter = blocks.len() + 1;
            if let Some(block) = self.synthesize_cluster(page_number, counter, &cluster) {
                tracing::debug!(
                    page = page_number,
                    block_id = %block.block_id,
                    content_mode = ?block.content_mode,
                    optional = block.optional,
                    "Synthesized block"
                );
                blocks.push(block);
            }
        }

        blocks
    }

    fn synthesize_cluster(
        &self,
        page_number: u32,
        counter: usize,
        cluster: &Cluster<'_>,
    ) -> Option<TemplateBlock> {
        let texts: Vec<String> = cluster
            .elements
            .iter()
            .filter_map(|e| e.text_sample())
            .collect();
        if texts.iter().all(|t| t.trim().is_empty()) {
            return None;
        }

        let element_type = cluster.element_type;
        let document_percentage = self.frequency.document_percentage(element_type);
        let optional = document_percentage < self.thresholds.block_optional_below_percentage;
        let frequency_info = FrequencyInfo {
            document_percentage,
            total_occurrences: self.frequency.total_occurrences(element_type),
        };
        let block_id = block_id(page_number, element_type, counter);

        let mut block = if self.staticity.is_static(&texts) {
            let static_text = most_common(texts.iter().map(String::as_str))
                .unwrap_or_default()
                .to_string();
            TemplateBlock::fixed(
                block_id,
                element_type.to_string(),
                optional,
                frequency_info,
                static_text,
            )
        } else {
            let pii_type = cluster
                .elements
                .iter()
                .map(|e| &e.pii_type)
                .find(|p| !p.is_none())
                .cloned()
                .unwrap_or(PiiType::None);
            let field_schema = FieldSchema {
                field_id: element_type.to_string(),
                label: title_case(element_type),
                data_type: "string".to_string(),
                required: !optional,
                pii_type,
                description: None,
                category: None,
            };
            TemplateBlock::fillable(
                block_id,
                element_type.to_string(),
                optional,
                frequency_info,
                field_schema,
            )
        };

        block.description = most_common(
            cluster
                .elements
                .iter()
                .filter_map(|e| e.description.as_deref())
                .filter(|d| !d.is_empty()),
        )
        .unwrap_or_default()
        .to_string();
        block.chart_data = cluster.elements.iter().find_map(|e| e.chart()).cloned();
        block.figure_data = cluster.elements.iter().find_map(|e| e.figure()).cloned();

        Some(block)
    }
}

fn cluster_by_type<'a>(group: &[&'a PageRecord]) -> Vec<Cluster<'a>> {
    let mut clusters: Vec<Cluster<'a>> = Vec::new();

    for record in group.iter().copied() {
        for element in &record.elements {
            let element_type = element.element_type.as_str();
            match clusters.iter_mut().find(|c| c.element_type == element_type) {
                Some(cluster) => cluster.elements.push(element),
                None => clusters.push(Cluster {
                    element_type,
                    elements: vec![element],
                }),
            }
        }
    }

    clusters
}

/// `page_{n}_block_{type}_{counter}` with the type reduced to
/// `[a-z0-9_]`, so ids stay readable and unique within the page.
fn block_id(page_number: u32, element_type: &str, counter: usize) -> String {
    let slug: String = element_type
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("page_{}_block_{}_{}", page_number, slug, counter)
}
