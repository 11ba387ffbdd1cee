// tether-core/src/domain/lineage.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::{EntityModel, TYPE_NAME_PREFIX};

pub const GENERIC_PROCESS_TYPE: &str = "Process";
pub const STAGE_LOAD_PROCESS_TYPE: &str = "catalog_stage_load_process";

// ── Identity capability ──────────────────────────────────────────────

/// Anything the catalog can be asked about by (qualified name, type name).
pub trait CatalogIdentity {
    fn qualified_name(&self) -> String;
    fn type_name(&self) -> String;
}

impl CatalogIdentity for EntityModel {
    fn qualified_name(&self) -> String {
        EntityModel::qualified_name(self)
    }

    fn type_name(&self) -> String {
        EntityModel::type_name(self)
    }
}

impl CatalogIdentity for LineageProcessRecord {
    fn qualified_name(&self) -> String {
        self.qualified_name.clone()
    }

    fn type_name(&self) -> String {
        self.process_type.type_name().to_string()
    }
}

/// The two kinds of object an existence check can target.
#[derive(Debug, Clone, Copy)]
pub enum CatalogObject<'a> {
    Entity(&'a EntityModel),
    Process(&'a LineageProcessRecord),
}

impl CatalogObject<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            CatalogObject::Entity(_) => "entity",
            CatalogObject::Process(_) => "lineage process",
        }
    }

    fn identity(&self) -> &dyn CatalogIdentity {
        match self {
            CatalogObject::Entity(e) => *e,
            CatalogObject::Process(p) => *p,
        }
    }
}

impl CatalogIdentity for CatalogObject<'_> {
    fn qualified_name(&self) -> String {
        self.identity().qualified_name()
    }

    fn type_name(&self) -> String {
        self.identity().type_name()
    }
}

// ── Process type ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessType {
    Generic,
    /// Stages are both datasets and processes in the catalog, so edges that
    /// touch one need a dedicated, pre-registered type.
    StageLoad,
}

impl ProcessType {
    pub fn for_endpoints(input: &EntityModel, output: &EntityModel) -> Self {
        if input.kind.is_stage() || output.kind.is_stage() {
            ProcessType::StageLoad
        } else {
            ProcessType::Generic
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ProcessType::Generic => GENERIC_PROCESS_TYPE,
            ProcessType::StageLoad => STAGE_LOAD_PROCESS_TYPE,
        }
    }
}

// ── Lineage process record ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageProcessRecord {
    pub name: String,
    pub qualified_name: String,
    pub process_type: ProcessType,
    pub input: EntityModel,
    pub output: EntityModel,
    /// Client-side placeholder id; the catalog assigns the real one.
    pub guid: String,
}

impl LineageProcessRecord {
    /// Build the edge `input -> output` with a fresh placeholder guid.
    pub fn new(input: EntityModel, output: EntityModel) -> Self {
        let process_type = ProcessType::for_endpoints(&input, &output);
        Self {
            name: format!("from {} to {}", input.display_name(), output.display_name()),
            qualified_name: Self::derive_qualified_name(&input, &output),
            process_type,
            input,
            output,
            guid: placeholder_guid(),
        }
    }

    pub fn derive_qualified_name(input: &EntityModel, output: &EntityModel) -> String {
        format!(
            "lineage_from_{}_to_{}",
            input.qualified_name(),
            output.qualified_name()
        )
    }

    pub fn type_name(&self) -> &'static str {
        self.process_type.type_name()
    }
}

/// Leading `-` marks an id the catalog has not persisted yet.
pub fn placeholder_guid() -> String {
    format!("-{}", Uuid::new_v4())
}

// ── Type definitions ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogTypeDefinition {
    pub name: String,
    pub category: String,
    pub super_types: Vec<String>,
    pub description: String,
    pub type_version: String,
    #[serde(default)]
    pub attribute_defs: Vec<serde_json::Value>,
}

impl CatalogTypeDefinition {
    /// `catalog_stage_load_process`, a DataSet that is also a Process.
    pub fn stage_load() -> Self {
        Self {
            name: STAGE_LOAD_PROCESS_TYPE.to_string(),
            category: "ENTITY".to_string(),
            super_types: vec!["DataSet".to_string(), "Process".to_string()],
            description: format!(
                "Lineage edge touching a warehouse stage ({}stage)",
                TYPE_NAME_PREFIX
            ),
            type_version: "1.0".to_string(),
            attribute_defs: Vec::new(),
        }
    }
}
