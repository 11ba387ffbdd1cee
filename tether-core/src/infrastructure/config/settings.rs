// tether-core/src/infrastructure/config/settings.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use validator::{Validate, ValidationError};

pub const DEFAULT_QUERY: &str = "SELECT * FROM lineage_object_dependencies";
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
pub const DEFAULT_SCOPE: &str = "https://purview.azure.net/.default";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TetherConfig {
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub sync: SyncSettings,
}

// --- WAREHOUSE ---

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct WarehouseConfig {
    /// DuckDB database file, or `:memory:`.
    #[validate(length(min = 1, message = "warehouse.database is required"))]
    #[serde(default)]
    pub database: String,

    #[validate(length(min = 1, message = "warehouse.query cannot be empty"))]
    #[serde(default = "default_query")]
    pub query: String,

    /// Host recorded on every row (and thus in every qualified name).
    #[validate(length(min = 1, message = "warehouse.origin_host is required"))]
    #[serde(default)]
    pub origin_host: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            database: String::new(),
            query: default_query(),
            origin_host: String::new(),
        }
    }
}

// --- CATALOG ---

#[derive(Deserialize, Serialize, Clone, Validate)]
#[validate(schema(function = "validate_endpoint"))]
pub struct CatalogConfig {
    /// Purview account name; the endpoint is derived from it unless set.
    #[serde(default)]
    pub account: String,

    #[serde(default)]
    pub endpoint: Option<String>,

    #[validate(length(min = 1, message = "catalog.tenant_id is required"))]
    #[serde(default)]
    pub tenant_id: String,

    #[validate(length(min = 1, message = "catalog.client_id is required"))]
    #[serde(default)]
    pub client_id: String,

    #[validate(length(min = 1, message = "catalog.client_secret is required"))]
    #[serde(default, skip_serializing)]
    pub client_secret: String,

    #[serde(default = "default_authority")]
    pub authority: String,

    #[serde(default = "default_scope")]
    pub scope: String,

    #[validate(range(min = 1, max = 600))]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_page_size")]
    pub search_page_size: usize,
}

impl CatalogConfig {
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("https://{}.purview.azure.com", self.account),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            endpoint: None,
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            authority: default_authority(),
            scope: default_scope(),
            timeout_secs: default_timeout_secs(),
            search_page_size: default_page_size(),
        }
    }
}

// Secret stays out of logs.
impl fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("account", &self.account)
            .field("endpoint", &self.endpoint)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("authority", &self.authority)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn validate_endpoint(config: &CatalogConfig) -> Result<(), ValidationError> {
    let has_endpoint = config.endpoint.as_deref().is_some_and(|e| !e.is_empty());
    if config.account.is_empty() && !has_endpoint {
        let mut err = ValidationError::new("catalog_endpoint");
        err.message = Some("either catalog.account or catalog.endpoint is required".into());
        return Err(err);
    }
    Ok(())
}

// --- SYNC ---

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SyncSettings {
    /// Cache existence lookups for the duration of one run.
    #[serde(default = "default_true")]
    pub memoize_lookups: bool,

    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            memoize_lookups: true,
            report_path: None,
        }
    }
}

fn default_query() -> String {
    DEFAULT_QUERY.to_string()
}
fn default_authority() -> String {
    DEFAULT_AUTHORITY.to_string()
}
fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_page_size() -> usize {
    1000
}
fn default_true() -> bool {
    true
}
