// tether-core/src/lib.rs

#![allow(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports: what the sync needs from a warehouse and a catalog.
pub mod ports;

// 2. Domain: entities, dependency rows, lineage records, wire payloads.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure: DuckDB row source, Atlas HTTP gateway, config, fs.
pub mod infrastructure;

// 4. Application: transform, load, sync, plan, purge.
pub mod application;

pub mod error;

pub use error::TetherError;
