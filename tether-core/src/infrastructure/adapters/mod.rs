// tether-core/src/infrastructure/adapters/mod.rs

pub mod atlas;
pub mod auth;
pub mod duckdb;
#[cfg(test)]
pub mod memory;

pub use atlas::AtlasCatalogGateway;
pub use self::duckdb::DuckDBRowSource;
#[cfg(test)]
pub use memory::InMemoryCatalog;
