// tether-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::{Config, Connection};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

use crate::domain::dependency::{DependencyRow, OPTIONAL_COLUMNS, RawDependencyRow, REQUIRED_COLUMNS};
use crate::domain::error::DomainError;
use crate::error::TetherError;
use crate::infrastructure::config::{WarehouseConfig, ensure_valid};
use crate::infrastructure::error::{InfrastructureError, WarehouseError};
use crate::ports::warehouse::RowSource;

/// Reads object dependencies out of a DuckDB database.
///
/// A connection is opened per fetch and closed before the rows are handed
/// back, so no warehouse resource outlives the query.
pub struct DuckDBRowSource {
    database: String,
    query: String,
    origin_host: String,
}

impl DuckDBRowSource {
    pub fn new(config: &WarehouseConfig) -> Result<Self, InfrastructureError> {
        ensure_valid("warehouse", config)?;
        Ok(Self {
            database: config.database.clone(),
            query: config.query.trim().trim_end_matches(';').to_string(),
            origin_host: config.origin_host.clone(),
        })
    }

    fn open(&self) -> Result<Connection, WarehouseError> {
        let config = Config::default();
        let conn = if self.database == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(&self.database, config)?
        };
        Ok(conn)
    }

    /// Map lower-cased column names to the names the query actually returns.
    fn resolve_columns(&self, conn: &Connection) -> Result<HashMap<String, String>, WarehouseError> {
        let mut stmt = conn.prepare(&format!("DESCRIBE {}", self.query))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(names
            .into_iter()
            .map(|name| (name.to_lowercase(), name))
            .collect())
    }

    /// Explicit projection: required columns cast to text, optional ones NULL
    /// when absent.
    fn projection_sql(&self, columns: &HashMap<String, String>) -> Result<String, DomainError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !columns.contains_key(**c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::MissingColumns(missing));
        }

        let select_list = REQUIRED_COLUMNS
            .iter()
            .chain(OPTIONAL_COLUMNS.iter())
            .map(|col| match columns.get(*col) {
                Some(actual) => format!("CAST({} AS VARCHAR) AS {}", quote_ident(actual), col),
                None => format!("CAST(NULL AS VARCHAR) AS {}", col),
            })
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("SELECT {} FROM ({}) AS deps", select_list, self.query))
    }

    #[instrument(skip(self), fields(database = %self.database))]
    fn read_rows(&self) -> Result<Vec<RawDependencyRow>, TetherError> {
        let conn = self.open()?;

        let columns = self.resolve_columns(&conn)?;
        let sql = self.projection_sql(&columns)?;
        debug!(sql = %sql, "Running dependency query");

        let mut stmt = conn.prepare(&sql).map_err(WarehouseError::from)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RawDependencyRow {
                    referenced_database: row.get(0)?,
                    referenced_schema: row.get(1)?,
                    referenced_object_name: row.get(2)?,
                    referenced_object_domain: row.get(3)?,
                    referencing_database: row.get(4)?,
                    referencing_schema: row.get(5)?,
                    referencing_object_name: row.get(6)?,
                    referencing_object_domain: row.get(7)?,
                    dependency_type: row.get(8)?,
                    stage_url: row.get(9)?,
                    origin_host: Some(self.origin_host.clone()),
                })
            })
            .map_err(WarehouseError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(WarehouseError::from)?;

        // Statement and connection are released here, before any catalog call.
        drop(stmt);
        drop(conn);

        Ok(rows)
    }
}

#[async_trait]
impl RowSource for DuckDBRowSource {
    async fn fetch_dependencies(&self) -> Result<Vec<DependencyRow>, TetherError> {
        let raws = self.read_rows()?;
        info!(rows = raws.len(), "Fetched dependency rows from warehouse");
        Ok(DependencyRow::validate_all(raws)?)
    }

    fn origin_host(&self) -> &str {
        &self.origin_host
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
