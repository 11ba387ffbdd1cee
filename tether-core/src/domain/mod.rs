pub mod dependency;
pub mod entity;
pub mod error;
pub mod lineage;
pub mod payload;

// Re-exports to keep imports short elsewhere
pub use dependency::{DependencyRow, ObjectRef, RawDependencyRow};
pub use entity::{EntityModel, ObjectKind};
pub use error::DomainError;
pub use lineage::{
    CatalogIdentity, CatalogObject, CatalogTypeDefinition, LineageProcessRecord, ProcessType,
};
