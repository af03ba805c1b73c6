//! Read-only index over the master element catalog.
//!
//! The catalog is a versioned JSON taxonomy: top-level `sections` map to
//! arbitrarily nested objects, and any object carrying a `field_id` is an
//! element definition. The registry is built once and shared by reference.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CatalogError;
use crate::record::PiiType;
use crate::util::title_case;

const CATALOG_SCHEMA: &str = include_str!("../../../../schema/catalog-v1.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogElementDefinition {
    pub field_id: String,
    pub label: String,
    pub description: String,
    pub data_type: String,
    pub required: bool,
    pub pii_type: PiiType,
    /// Top-level section the definition was found in.
    pub category: String,
    /// Dotted path of the intermediate keys below the section.
    pub parent_key: String,
    #[serde(default)]
    pub schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    pub template_id: String,
    pub name: String,
    pub version: String,
    pub created_date: Option<String>,
}

impl Default for CatalogMetadata {
    fn default() -> Self {
        Self {
            template_id: "unknown".to_string(),
            name: "Unknown".to_string(),
            version: "1.0".to_string(),
            created_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub name: String,
    pub element_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub catalog_id: String,
    pub catalog_name: String,
    pub version: String,
    pub total_sections: usize,
    pub total_elements: usize,
    pub sections: BTreeMap<String, SectionSummary>,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    metadata: CatalogMetadata,
    elements: HashMap<String, CatalogElementDefinition>,
    section_counts: BTreeMap<String, usize>,
}

impl CatalogRegistry {
    /// Registry with no definitions; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_json_str(&content)
    }

    /// Loads the catalog, degrading to an empty registry on any failure.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(registry) => {
                log::info!(
                    "Loaded master catalog '{}' with {} elements",
                    registry.metadata.name,
                    registry.len()
                );
                registry
            }
            Err(e) => {
                log::warn!("Master catalog unavailable, continuing without it: {}", e);
                Self::empty()
            }
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, CatalogError> {
        validate_structure(value)?;

        let text_or = |key: &str, default: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or(default)
                .to_string()
        };
        let defaults = CatalogMetadata::default();
        let metadata = CatalogMetadata {
            template_id: text_or("template_id", &defaults.template_id),
            name: text_or("name", &defaults.name),
            version: text_or("version", &defaults.version),
            created_date: value
                .get("created_date")
                .and_then(Value::as_str)
                .map(str::to_string),
        };

        let mut registry = Self {
            metadata,
            elements: HashMap::new(),
            section_counts: BTreeMap::new(),
        };

        if let Some(sections) = value.get("sections").and_then(Value::as_object) {
            for (section_name, section) in sections {
                let mut count = 0;
                if let Some(section) = section.as_object() {
                    registry.collect_section(section_name, section, "", &mut count);
                }
                registry.section_counts.insert(section_name.clone(), count);
            }
        }

        Ok(registry)
    }

    fn collect_section(
        &mut self,
        section_name: &str,
        node: &Map<String, Value>,
        parent_key: &str,
        count: &mut usize,
    ) {
        for (key, value) in node {
            let Some(object) = value.as_object() else {
                continue;
            };

            if object.contains_key("field_id") {
                let definition = build_definition(key, object, section_name, parent_key);
                *count += 1;
                if let Some(previous) = self
                    .elements
                    .insert(definition.field_id.clone(), definition)
                {
                    log::warn!(
                        "Duplicate catalog field_id '{}' (section '{}'), keeping the later definition",
                        previous.field_id,
                        section_name
                    );
                }
            } else {
                let nested_parent = if parent_key.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", parent_key, key)
                };
                self.collect_section(section_name, object, &nested_parent, count);
            }
        }
    }

    pub fn lookup(&self, field_id: &str) -> Option<&CatalogElementDefinition> {
        self.elements.get(field_id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    /// All definitions ordered by field id.
    pub fn definitions(&self) -> Vec<&CatalogElementDefinition> {
        let mut definitions: Vec<_> = self.elements.values().collect();
        definitions.sort_by(|a, b| a.field_id.cmp(&b.field_id));
        definitions
    }

    /// Category name to sorted field ids, categories in sorted order.
    pub fn list_by_category(&self) -> BTreeMap<String, Vec<String>> {
        let mut by_category: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for definition in self.elements.values() {
            by_category
                .entry(definition.category.clone())
                .or_default()
                .push(definition.field_id.clone());
        }
        for field_ids in by_category.values_mut() {
            field_ids.sort();
        }
        by_category
    }

    /// Enumeration of the catalog handed to the extraction layer.
    pub fn element_types_prompt(&self) -> String {
        let mut prompt = String::from("AVAILABLE ELEMENT TYPES FROM MASTER CATALOG:\n\n");

        for (category, field_ids) in self.list_by_category() {
            prompt.push_str(&format!("**{}:**\n", title_case(&category)));
            for field_id in field_ids {
                if let Some(definition) = self.lookup(&field_id) {
                    prompt.push_str(&format!(
                        "  - {}: {} ({})\n",
                        field_id, definition.label, definition.data_type
                    ));
                }
            }
            prompt.push('\n');
        }

        prompt
    }

    pub fn summary(&self) -> CatalogSummary {
        let sections = self
            .section_counts
            .iter()
            .map(|(name, count)| {
                (
                    name.clone(),
                    SectionSummary {
                        name: title_case(name),
                        element_count: *count,
                    },
                )
            })
            .collect();

        CatalogSummary {
            catalog_id: self.metadata.template_id.clone(),
            catalog_name: self.metadata.name.clone(),
            version: self.metadata.version.clone(),
            total_sections: self.section_counts.len(),
            total_elements: self.elements.len(),
            sections,
        }
    }
}

fn build_definition(
    key: &str,
    object: &Map<String, Value>,
    section_name: &str,
    parent_key: &str,
) -> CatalogElementDefinition {
    let text = |name: &str| object.get(name).and_then(Value::as_str);

    let field_id = match object.get("field_id") {
        Some(Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
        None => key.to_string(),
    };

    CatalogElementDefinition {
        field_id,
        label: text("label")
            .map(str::to_string)
            .unwrap_or_else(|| title_case(key)),
        description: text("description").unwrap_or_default().to_string(),
        data_type: text("data_type").unwrap_or("string").to_string(),
        required: object
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        pii_type: text("pii_type").map(PiiType::from).unwrap_or_default(),
        category: section_name.to_string(),
        parent_key: parent_key.to_string(),
        schema: object
            .get("schema")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new())),
    }
}

fn validate_structure(value: &Value) -> Result<(), CatalogError> {
    let schema: Value =
        serde_json::from_str(CATALOG_SCHEMA).map_err(|e| CatalogError::InvalidStructure {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator =
        jsonschema::validator_for(&schema).map_err(|e| CatalogError::InvalidStructure {
            message: format!("Failed to compile JSON schema: {}", e),
        })?;

    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| e.to_string())
        .collect();
    if !errors.is_empty() {
        return Err(CatalogError::InvalidStructure {
            message: errors.join("; "),
        });
    }

    Ok(())
}
