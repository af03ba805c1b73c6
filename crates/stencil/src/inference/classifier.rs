//! Keyword rules that describe an ordinal group: which kinds of content it
//! holds, what role the page plays, and what to call it.

use std::collections::BTreeSet;

use crate::record::PageRecord;
use crate::template::{ContentTypeTag, PageRole};
use crate::util::most_common;

/// How a rule tests a lower-cased element type.
#[derive(Debug, Clone, Copy)]
enum TypeMatch {
    Contains(&'static [&'static str]),
    Exact(&'static [&'static str]),
}

impl TypeMatch {
    fn matches(&self, element_type: &str) -> bool {
        match self {
            TypeMatch::Contains(keywords) => keywords.iter().any(|k| element_type.contains(k)),
            TypeMatch::Exact(names) => names.iter().any(|n| *n == element_type),
        }
    }
}

const CONTENT_RULES: &[(ContentTypeTag, TypeMatch)] = &[
    (ContentTypeTag::Charts, TypeMatch::Contains(&["chart", "graph"])),
    (
        ContentTypeTag::Headings,
        TypeMatch::Exact(&["title", "subtitle", "heading", "sections_h1", "subsections_h2"]),
    ),
    (
        ContentTypeTag::Text,
        TypeMatch::Exact(&["paragraph", "paragraphs", "text", "explanations"]),
    ),
    (ContentTypeTag::Tables, TypeMatch::Contains(&["table"])),
    (
        ContentTypeTag::Figures,
        TypeMatch::Contains(&["figure", "image", "diagram"]),
    ),
    (
        ContentTypeTag::Lists,
        TypeMatch::Contains(&["list", "bullet", "numbered"]),
    ),
    (
        ContentTypeTag::Summary,
        TypeMatch::Exact(&[
            "executive_summary",
            "executive_summary_text",
            "executive_summary_key_points",
        ]),
    ),
];

/// Element types whose text may serve as a page title. Matched verbatim.
const TITLE_TYPES: &[&str] = &["title", "heading", "sections_h1"];

fn lowercase_types<'a>(group: &'a [&'a PageRecord]) -> impl Iterator<Item = String> + 'a {
    group
        .iter()
        .flat_map(|record| record.elements.iter())
        .map(|element| element.element_type.to_lowercase())
}

/// Every content tag matched by any element in the group, sorted.
pub fn classify_content_types(group: &[&PageRecord]) -> Vec<ContentTypeTag> {
    let mut tags = BTreeSet::new();
    for element_type in lowercase_types(group) {
        for (tag, rule) in CONTENT_RULES {
            if rule.matches(&element_type) {
                tags.insert(*tag);
            }
        }
    }
    tags.into_iter().collect()
}

/// First matching role in fixed priority order.
pub fn infer_page_role(group: &[&PageRecord], ordinal: u32) -> PageRole {
    if ordinal == 1 {
        return PageRole::CoverIntroduction;
    }

    let types: Vec<String> = lowercase_types(group).collect();

    if any_contains(&types, &["executive_summary"]) {
        PageRole::ExecutiveSummary
    } else if any_contains(&types, &["chart", "graph"]) {
        if any_contains(&types, &["financial", "revenue"]) {
            PageRole::FinancialAnalysis
        } else {
            PageRole::DataVisualization
        }
    } else if any_contains(&types, &["contact"]) {
        PageRole::ContactInformation
    } else if any_contains(&types, &["table"]) {
        PageRole::TabularData
    } else if types.iter().filter(|t| *t == "paragraph").count() > 2 {
        PageRole::DetailedContent
    } else {
        PageRole::MixedContent
    }
}

fn any_contains(types: &[String], keywords: &[&str]) -> bool {
    types
        .iter()
        .any(|t| keywords.iter().any(|k| t.contains(k)))
}

/// Most common short heading text, else a title derived from the role.
pub fn infer_page_title(
    group: &[&PageRecord],
    ordinal: u32,
    role: PageRole,
    max_chars: usize,
) -> String {
    let candidates = group
        .iter()
        .flat_map(|record| record.elements.iter())
        .filter(|element| TITLE_TYPES.iter().any(|t| *t == element.element_type))
        .filter_map(|element| element.text.as_deref())
        .filter(|text| !text.is_empty() && text.chars().count() < max_chars);

    match most_common(candidates) {
        Some(title) => title.to_string(),
        None => role.fallback_title(ordinal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DEFAULT_TITLE_MAX_CHARS;
    use crate::record::DetectedElement;

    fn page(doc_id: &str, ordinal: u32, elements: Vec<DetectedElement>) -> PageRecord {
        PageRecord::new(doc_id, ordinal, elements)
    }

    fn types(list: &[&str]) -> Vec<DetectedElement> {
        list.iter().map(|t| DetectedElement::new(*t)).collect()
    }

    #[test]
    fn test_content_types_sorted_and_deduplicated() {
        let a = page("a", 2, types(&["paragraph", "revenue_chart", "Title"]));
        let b = page("b", 2, types(&["bar_graph", "data_table", "bullet_list"]));
        let group = vec![&a, &b];

        assert_eq!(
            classify_content_types(&group),
            [
                ContentTypeTag::Charts,
                ContentTypeTag::Headings,
                ContentTypeTag::Lists,
                ContentTypeTag::Tables,
                ContentTypeTag::Text,
            ]
        );
    }

    #[test]
    fn test_element_can_match_several_rules() {
        // Matches both the chart and the table keyword.
        let a = page("a", 3, types(&["chart_table"]));
        let group = vec![&a];
        assert_eq!(
            classify_content_types(&group),
            [ContentTypeTag::Charts, ContentTypeTag::Tables]
        );
    }

    #[test]
    fn test_summary_and_figure_tags() {
        let a = page("a", 2, types(&["executive_summary_text", "org_diagram"]));
        let group = vec![&a];
        assert_eq!(
            classify_content_types(&group),
            [ContentTypeTag::Figures, ContentTypeTag::Summary]
        );
    }

    #[test]
    fn test_first_ordinal_is_always_cover() {
        let a = page("a", 1, types(&["executive_summary_text", "revenue_chart"]));
        assert_eq!(infer_page_role(&[&a], 1), PageRole::CoverIntroduction);
    }

    #[test]
    fn test_role_priority_order() {
        let cases = vec![
            (vec!["executive_summary_text", "chart"], PageRole::ExecutiveSummary),
            (vec!["revenue_chart"], PageRole::FinancialAnalysis),
            (vec!["line_graph", "financial_notes"], PageRole::FinancialAnalysis),
            (vec!["line_graph", "contact_email"], PageRole::DataVisualization),
            (vec!["contact_email", "data_table"], PageRole::ContactInformation),
            (vec!["data_table", "paragraph"], PageRole::TabularData),
            (vec!["paragraph", "paragraph", "paragraph"], PageRole::DetailedContent),
            (vec!["paragraph", "paragraph"], PageRole::MixedContent),
            (vec!["Paragraph", "PARAGRAPH", "paragraph"], PageRole::DetailedContent),
        ];

        for (element_types, expected) in cases {
            let a = page("a", 4, types(&element_types));
            assert_eq!(
                infer_page_role(&[&a], 4),
                expected,
                "types: {:?}",
                element_types
            );
        }
    }

    #[test]
    fn test_title_is_most_common_heading() {
        let a = page(
            "a",
            2,
            vec![DetectedElement::new("title").with_text("Overview")],
        );
        let b = page(
            "b",
            2,
            vec![DetectedElement::new("heading").with_text("Our Business")],
        );
        let c = page(
            "c",
            2,
            vec![DetectedElement::new("title").with_text("Our Business")],
        );
        let group = vec![&a, &b, &c];
        let role = infer_page_role(&group, 2);

        assert_eq!(
            infer_page_title(&group, 2, role, DEFAULT_TITLE_MAX_CHARS),
            "Our Business"
        );
    }

    #[test]
    fn test_long_headings_are_ignored() {
        let long = "x".repeat(DEFAULT_TITLE_MAX_CHARS);
        let a = page(
            "a",
            2,
            vec![
                DetectedElement::new("title").with_text(long),
                DetectedElement::new("executive_summary_text").with_text("Body"),
            ],
        );
        let group = vec![&a];
        let role = infer_page_role(&group, 2);

        assert_eq!(
            infer_page_title(&group, 2, role, DEFAULT_TITLE_MAX_CHARS),
            "Executive Summary"
        );
    }

    #[test]
    fn test_title_fallbacks() {
        let a = page("a", 5, types(&["paragraph"]));
        let group = vec![&a];
        assert_eq!(
            infer_page_title(&group, 5, infer_page_role(&group, 5), DEFAULT_TITLE_MAX_CHARS),
            "Page 5 Content"
        );

        let cover = page("a", 1, types(&["logo"]));
        let group = vec![&cover];
        assert_eq!(
            infer_page_title(&group, 1, infer_page_role(&group, 1), DEFAULT_TITLE_MAX_CHARS),
            "Cover Page"
        );
    }
}
