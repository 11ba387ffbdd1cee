// tether-core/src/domain/entity.rs
//
// Catalog identity of a single warehouse object.
// Qualified name and type name are pure functions of the coordinates; they are
// the dedup key against the catalog, so any change here re-creates lineage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

pub const QUALIFIED_NAME_SCHEME: &str = "catalog";
pub const TYPE_NAME_PREFIX: &str = "catalog_";

// ── Object kind ──────────────────────────────────────────────────────

/// Warehouse classification of an object (the `*_OBJECT_DOMAIN` column).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ObjectKind {
    Table,
    View,
    MaterializedView,
    Stage,
    /// Any other domain the warehouse reports (FUNCTION, EXTERNAL TABLE...),
    /// stored upper-cased with single spaces.
    Other(String),
}

impl ObjectKind {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectKind::Table => "TABLE",
            ObjectKind::View => "VIEW",
            ObjectKind::MaterializedView => "MATERIALIZED VIEW",
            ObjectKind::Stage => "STAGE",
            ObjectKind::Other(raw) => raw,
        }
    }

    pub fn is_stage(&self) -> bool {
        matches!(self, ObjectKind::Stage)
    }

    /// Path segment used inside qualified names: `tables`, `materialized_views`...
    pub fn plural_segment(&self) -> String {
        format!("{}s", self.as_str().to_lowercase().replace(' ', "_"))
    }

    /// Catalog type name. MATERIALIZED VIEW and VIEW share `catalog_view`.
    pub fn type_name(&self) -> String {
        format!("{}{}", TYPE_NAME_PREFIX, self.as_str())
            .to_lowercase()
            .replace(' ', "_")
            .replace("materialized_", "")
    }
}

impl FromStr for ObjectKind {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return Err(DomainError::UnknownObjectKind(raw.to_string()));
        }

        let upper = normalized.to_uppercase();
        Ok(match upper.as_str() {
            "TABLE" => ObjectKind::Table,
            "VIEW" => ObjectKind::View,
            "MATERIALIZED VIEW" => ObjectKind::MaterializedView,
            "STAGE" => ObjectKind::Stage,
            _ => ObjectKind::Other(upper),
        })
    }
}

impl TryFrom<String> for ObjectKind {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectKind> for String {
    fn from(kind: ObjectKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Entity model ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityModel {
    /// `None` for account-level objects.
    pub database: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub kind: ObjectKind,
    /// Warehouse host the object lives on.
    pub server: String,
}

impl EntityModel {
    pub fn new(
        database: Option<String>,
        schema: Option<String>,
        name: impl Into<String>,
        kind: ObjectKind,
        server: impl Into<String>,
    ) -> Self {
        Self {
            database,
            schema,
            name: name.into(),
            kind,
            server: server.into(),
        }
    }

    /// `catalog://{server}/databases/{db}/schemas/{schema}/{kind_plural}/{object_ref}`
    ///
    /// Missing database or schema segments are left out entirely.
    pub fn qualified_name(&self) -> String {
        let mut qn = format!("{}://{}", QUALIFIED_NAME_SCHEME, self.server);
        if let Some(db) = &self.database {
            qn.push_str("/databases/");
            qn.push_str(db);
        }
        if let Some(schema) = &self.schema {
            qn.push_str("/schemas/");
            qn.push_str(schema);
        }
        qn.push('/');
        qn.push_str(&self.kind.plural_segment());
        qn.push('/');
        qn.push_str(&self.object_ref());
        qn
    }

    pub fn type_name(&self) -> String {
        self.kind.type_name()
    }

    /// Stages are addressed as `@name` in the warehouse.
    fn object_ref(&self) -> String {
        if self.kind.is_stage() {
            format!("@{}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// `database.schema.name`, lower-cased, for human-readable labels.
    pub fn display_name(&self) -> String {
        [self.database.as_deref(), self.schema.as_deref(), Some(self.name.as_str())]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(".")
            .to_lowercase()
    }
}

impl fmt::Display for EntityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}
