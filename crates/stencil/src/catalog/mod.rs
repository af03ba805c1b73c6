pub mod coverage;
pub mod mapper;
pub mod registry;

pub use coverage::{analyze_coverage, CoverageReport};
pub use mapper::{ElementMapper, MappedElement, MappingStatus, CUSTOM_CATEGORY, CUSTOM_FIELD_PREFIX};
pub use registry::{
    CatalogElementDefinition, CatalogMetadata, CatalogRegistry, CatalogSummary, SectionSummary,
};
