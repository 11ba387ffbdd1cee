// tether-core/src/domain/dependency.rs
//
// One warehouse-reported edge: "referencing object depends on referenced object".

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entity::{EntityModel, ObjectKind};
use crate::domain::error::DomainError;

/// Columns every dependency query must expose (matched case-insensitively).
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "referenced_database",
    "referenced_schema",
    "referenced_object_name",
    "referenced_object_domain",
    "referencing_database",
    "referencing_schema",
    "referencing_object_name",
    "referencing_object_domain",
    "dependency_type",
];

pub const OPTIONAL_COLUMNS: [&str; 1] = ["stage_url"];

/// A row exactly as read from the warehouse, before any check.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RawDependencyRow {
    pub referenced_database: Option<String>,
    pub referenced_schema: Option<String>,
    #[validate(required, custom(function = "not_blank"))]
    pub referenced_object_name: Option<String>,
    #[validate(required, custom(function = "not_blank"))]
    pub referenced_object_domain: Option<String>,

    #[validate(required, custom(function = "not_blank"))]
    pub referencing_database: Option<String>,
    #[validate(required, custom(function = "not_blank"))]
    pub referencing_schema: Option<String>,
    #[validate(required, custom(function = "not_blank"))]
    pub referencing_object_name: Option<String>,
    #[validate(required, custom(function = "not_blank"))]
    pub referencing_object_domain: Option<String>,

    #[validate(required, custom(function = "not_blank"))]
    pub dependency_type: Option<String>,
    pub stage_url: Option<String>,

    /// Attached after the query, not part of the warehouse row.
    #[validate(required, custom(function = "not_blank"))]
    pub origin_host: Option<String>,
}

/// Coordinates of one side of a dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub database: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub kind: ObjectKind,
}

impl ObjectRef {
    pub fn to_entity(&self, server: &str) -> EntityModel {
        EntityModel::new(
            self.database.clone(),
            self.schema.clone(),
            self.name.clone(),
            self.kind.clone(),
            server,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRow {
    pub referenced: ObjectRef,
    pub referencing: ObjectRef,
    pub dependency_type: String,
    pub stage_url: Option<String>,
    pub origin_host: String,
}

impl DependencyRow {
    pub fn referenced_entity(&self) -> EntityModel {
        self.referenced.to_entity(&self.origin_host)
    }

    pub fn referencing_entity(&self) -> EntityModel {
        self.referencing.to_entity(&self.origin_host)
    }

    /// Validate a raw row. `index` is only used to locate the error.
    pub fn from_raw(index: usize, raw: RawDependencyRow) -> Result<Self, DomainError> {
        raw.validate()
            .map_err(|e| DomainError::SchemaValidation {
                row: index,
                reason: e.to_string(),
            })?;

        let kind = |value: Option<String>| -> Result<ObjectKind, DomainError> {
            value
                .unwrap_or_default()
                .parse()
                .map_err(|e: DomainError| DomainError::SchemaValidation {
                    row: index,
                    reason: e.to_string(),
                })
        };

        Ok(Self {
            referenced: ObjectRef {
                database: non_blank(raw.referenced_database),
                schema: non_blank(raw.referenced_schema),
                name: raw.referenced_object_name.unwrap_or_default(),
                kind: kind(raw.referenced_object_domain)?,
            },
            referencing: ObjectRef {
                database: non_blank(raw.referencing_database),
                schema: non_blank(raw.referencing_schema),
                name: raw.referencing_object_name.unwrap_or_default(),
                kind: kind(raw.referencing_object_domain)?,
            },
            dependency_type: raw.dependency_type.unwrap_or_default(),
            stage_url: non_blank(raw.stage_url),
            origin_host: raw.origin_host.unwrap_or_default(),
        })
    }

    /// Validate every row; the first failure aborts the whole batch.
    pub fn validate_all(raws: Vec<RawDependencyRow>) -> Result<Vec<Self>, DomainError> {
        raws.into_iter()
            .enumerate()
            .map(|(i, raw)| Self::from_raw(i, raw))
            .collect()
    }
}

/// Whitespace-only values count as missing for required columns.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
