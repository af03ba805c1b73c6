use serde::{Deserialize, Serialize};

use crate::catalog::registry::{CatalogElementDefinition, CatalogRegistry};
use crate::record::DetectedElement;
use crate::template::FieldSchema;
use crate::util::title_case;

/// Prefix of field ids synthesized for elements missing from the catalog.
pub const CUSTOM_FIELD_PREFIX: &str = "custom_";
pub const CUSTOM_CATEGORY: &str = "custom";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingStatus {
    Mapped,
    Unmapped,
}

/// A detected element paired with its catalog definition, if any.
#[derive(Debug, Clone)]
pub struct MappedElement<'a> {
    pub detected: &'a DetectedElement,
    pub definition: Option<&'a CatalogElementDefinition>,
    pub mapping_status: MappingStatus,
    pub field_schema: FieldSchema,
}

impl MappedElement<'_> {
    pub fn is_mapped(&self) -> bool {
        self.mapping_status == MappingStatus::Mapped
    }
}

/// Exact-match mapping of detected element types onto catalog field ids.
#[derive(Debug, Clone, Copy)]
pub struct ElementMapper<'a> {
    registry: &'a CatalogRegistry,
}

impl<'a> ElementMapper<'a> {
    pub fn new(registry: &'a CatalogRegistry) -> Self {
        Self { registry }
    }

    /// Maps every element, preserving input order.
    pub fn map<I>(&self, elements: I) -> Vec<MappedElement<'a>>
    where
        I: IntoIterator<Item = &'a DetectedElement>,
    {
        elements.into_iter().map(|e| self.map_one(e)).collect()
    }

    pub fn map_one(&self, element: &'a DetectedElement) -> MappedElement<'a> {
        match self.registry.lookup(&element.element_type) {
            Some(definition) => MappedElement {
                detected: element,
                definition: Some(definition),
                mapping_status: MappingStatus::Mapped,
                field_schema: catalog_field_schema(definition),
            },
            None => MappedElement {
                detected: element,
                definition: None,
                mapping_status: MappingStatus::Unmapped,
                field_schema: custom_field_schema(element),
            },
        }
    }
}

fn catalog_field_schema(definition: &CatalogElementDefinition) -> FieldSchema {
    FieldSchema {
        field_id: definition.field_id.clone(),
        label: definition.label.clone(),
        data_type: definition.data_type.clone(),
        required: definition.required,
        pii_type: definition.pii_type.clone(),
        description: Some(definition.description.clone()),
        category: Some(definition.category.clone()),
    }
}

fn custom_field_schema(element: &DetectedElement) -> FieldSchema {
    let element_type = &element.element_type;
    FieldSchema {
        field_id: format!("{}{}", CUSTOM_FIELD_PREFIX, element_type),
        label: title_case(element_type),
        data_type: "string".to_string(),
        required: false,
        pii_type: element.pii_type.clone(),
        description: Some(format!("Custom element: {}", element_type)),
        category: Some(CUSTOM_CATEGORY.to_string()),
    }
}
