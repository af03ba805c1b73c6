//! The inferred master template and its JSON persistence.

pub mod model;
pub mod store;

pub use model::{
    AnalysisSummary, CatalogIntegration, ContentMode, ContentTypeTag, DocumentStructure,
    FieldSchema, FrequencyInfo, MasterTemplate, PageRole, TemplateBlock, TemplatePage,
};
pub use store::{read_template, write_template};
