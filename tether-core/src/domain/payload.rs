// tether-core/src/domain/payload.rs
//
// Wire shapes sent to the catalog (Atlas v2 JSON).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::EntityModel;
use crate::domain::lineage::{CatalogTypeDefinition, LineageProcessRecord};

/// Reference to an entity the catalog already holds, by unique attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectIdPayload {
    pub type_name: String,
    pub unique_attributes: QualifiedNameAttr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedNameAttr {
    pub qualified_name: String,
}

impl From<&EntityModel> for ObjectIdPayload {
    fn from(entity: &EntityModel) -> Self {
        Self {
            type_name: entity.type_name(),
            unique_attributes: QualifiedNameAttr {
                qualified_name: entity.qualified_name(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityAttributes {
    pub name: String,
    pub qualified_name: String,
    /// ISO 8601, stamped when the payload is built.
    pub create_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityPayload {
    /// `None` lets the catalog assign one.
    pub guid: Option<String>,
    pub type_name: String,
    pub attributes: EntityAttributes,
}

impl EntityPayload {
    pub fn from_model(entity: &EntityModel, guid: Option<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            guid,
            type_name: entity.type_name(),
            attributes: EntityAttributes {
                name: entity.name.clone(),
                qualified_name: entity.qualified_name(),
                create_time: created_at.to_rfc3339(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessAttributes {
    pub name: String,
    pub qualified_name: String,
    pub inputs: Vec<ObjectIdPayload>,
    pub outputs: Vec<ObjectIdPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPayload {
    pub guid: String,
    pub type_name: String,
    pub attributes: ProcessAttributes,
}

impl From<&LineageProcessRecord> for ProcessPayload {
    fn from(record: &LineageProcessRecord) -> Self {
        Self {
            guid: record.guid.clone(),
            type_name: record.type_name().to_string(),
            attributes: ProcessAttributes {
                name: record.name.clone(),
                qualified_name: record.qualified_name.clone(),
                inputs: vec![ObjectIdPayload::from(&record.input)],
                outputs: vec![ObjectIdPayload::from(&record.output)],
            },
        }
    }
}

/// Body of `POST /entity/bulk`.
#[derive(Debug, Clone, Serialize)]
pub struct BulkEntitiesPayload {
    pub entities: Vec<ProcessPayload>,
}

impl BulkEntitiesPayload {
    pub fn from_records(records: &[LineageProcessRecord]) -> Self {
        Self {
            entities: records.iter().map(ProcessPayload::from).collect(),
        }
    }
}

/// Body of `POST|PUT /types/typedefs`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefsPayload {
    pub entity_defs: Vec<CatalogTypeDefinition>,
}
