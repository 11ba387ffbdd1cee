// tether-core/src/ports/mod.rs

pub mod catalog;
pub mod warehouse;

pub use catalog::{CatalogGateway, CatalogPurge, CatalogSearchHit};
pub use warehouse::RowSource;
