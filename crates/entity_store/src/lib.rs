//! # Entity Store
//!
//! Populates the eight scene entity collections consumed by the join engine.
//!
//! - [`JsonDirectoryLoader`]: one JSON array file per entity type
//! - [`InMemoryStore`] / [`StoreBuilder`]: the store itself, also used to build fixtures
//! - [`LoadStats`]: per-collection counts for reporting
//!
//! Any load failure is fatal for the run and converts into
//! `ContractError::StoreBootstrap`.

mod error;
mod loader;
mod memory;
mod stats;

pub use error::{Result, StoreError};
pub use loader::{JsonDirectoryLoader, ENTITY_FILES};
pub use memory::{InMemoryStore, StoreBuilder};
pub use stats::LoadStats;
