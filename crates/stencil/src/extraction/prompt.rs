//! Prompt construction for per-page structure extraction.

use crate::catalog::CatalogRegistry;

const PII_TOKENS: &str = "NONE|ORG_NAME|PERSON_NAME|EMAIL|PHONE|ADDRESS|URL|DATE";

/// Escapes chat-template control sequences so page text cannot open a new
/// turn in the conversation.
pub fn sanitize_for_prompt(text: &str) -> String {
    text.replace("<|", "< |")
        .replace("|>", "| >")
        .replace("[INST]", "[ INST ]")
        .replace("[/INST]", "[ / INST ]")
        .replace("<<SYS>>", "< < SYS > >")
        .replace("<</SYS>>", "< < / SYS > >")
}

/// System prompt listing the catalog's element types and the element shape
/// the model must return.
pub fn build_system_prompt(catalog: &CatalogRegistry) -> String {
    let catalog_section = if catalog.is_empty() {
        "No master catalog is loaded. Use short snake_case element types that describe each element.\n"
            .to_string()
    } else {
        catalog.element_types_prompt()
    };

    format!(
        r#"You are an expert document structure analyzer. Extract the complete structure of one document page.

{catalog_section}
RULES:
1. Prefer element types (field_id values) listed in the catalog above
2. Give every element a short description of what it contains
3. Mark personally identifiable information with pii_type
4. For charts and figures, extract data as name/value pairs
5. Include every visible element, however small

Each element has this shape (omit payloads that do not apply):
{{
  "element_id": "e1",
  "type": "field_id",
  "text": "content as it appears on the page",
  "description": "what this element contains",
  "items": ["list entries"],
  "table": {{"headers": ["col1"], "rows": [["val1"]]}},
  "chart": {{"chart_type": "bar|line|pie|scatter|area", "title": "", "description": "", "data": [{{"name": "Revenue", "value": "50M", "unit": "USD"}}]}},
  "figure": {{"figure_type": "diagram|image|infographic|logo", "title": "", "description": "", "elements": [{{"name": "Step 1", "value": "Collect"}}]}},
  "position_hint": "top|middle|bottom|header|footer",
  "pii_type": "{pii}"
}}

Return ONLY valid JSON with no additional commentary."#,
        catalog_section = catalog_section,
        pii = PII_TOKENS,
    )
}

/// User prompt carrying one page's text and its position in the document.
pub fn build_page_prompt(page_text: &str, doc_id: &str, page_index: u32) -> String {
    format!(
        r#"Analyze this page and extract its structure.

PAGE CONTENT:
{content}

Return a JSON object of this form:
{{
  "doc_id": "{doc_id}",
  "page_index": {page_index},
  "page_role": "cover|introduction|main_content|analysis|conclusion|end_matter",
  "elements": [ ... ]
}}"#,
        content = sanitize_for_prompt(page_text),
        doc_id = sanitize_for_prompt(doc_id),
        page_index = page_index,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_for_prompt_escapes_chat_markers() {
        assert_eq!(
            sanitize_for_prompt("<|im_start|>system [INST]"),
            "< |im_start| >system [ INST ]"
        );
        assert_eq!(sanitize_for_prompt("plain text"), "plain text");
    }

    #[test]
    fn test_system_prompt_lists_catalog_types() {
        let catalog = CatalogRegistry::from_value(&json!({
            "sections": {
                "contact": {
                    "email": {"field_id": "contact_email", "label": "Contact Email", "pii_type": "EMAIL"}
                }
            }
        }))
        .unwrap();

        let prompt = build_system_prompt(&catalog);
        assert!(prompt.contains("contact_email: Contact Email (string)"));
        assert!(prompt.contains("ORG_NAME"));
        assert!(!prompt.contains("No master catalog"));
    }

    #[test]
    fn test_system_prompt_without_catalog() {
        let prompt = build_system_prompt(&CatalogRegistry::empty());
        assert!(prompt.contains("No master catalog is loaded"));
    }

    #[test]
    fn test_page_prompt_embeds_position() {
        let prompt = build_page_prompt("Acme Corp\nAnnual profile", "acme", 3);
        assert!(prompt.contains("\"doc_id\": \"acme\""));
        assert!(prompt.contains("\"page_index\": 3"));
        assert!(prompt.contains("Acme Corp\nAnnual profile"));
    }
}
