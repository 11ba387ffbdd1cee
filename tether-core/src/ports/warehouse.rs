// tether-core/src/ports/warehouse.rs

use crate::domain::dependency::DependencyRow;
use crate::error::TetherError;
use async_trait::async_trait;

#[async_trait]
pub trait RowSource: Send + Sync {
    /// Run the dependency query and return every row, validated.
    ///
    /// Implementations must release their connection before returning; the
    /// caller goes on to make catalog calls with the rows in hand.
    async fn fetch_dependencies(&self) -> Result<Vec<DependencyRow>, TetherError>;

    /// Host attached to every row as `origin_host`.
    fn origin_host(&self) -> &str;
}
