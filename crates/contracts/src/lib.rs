//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Data flow
//! `EntityStore` → join → `SceneFact` → assemble → `AlertMessage` / `AdvisoryMessage`
//! → dispatch → `WireCodec`
//!
//! ## Time Model
//! - Source timestamps are epoch microseconds
//! - Published `timeStamp` fields are minute-of-year values

mod blueprint;
mod codec;
mod convert;
mod entity;
mod entity_id;
mod error;
mod fact;
mod message;
mod store;

pub use blueprint::*;
pub use codec::WireCodec;
pub use convert::{DecomposedTimestamp, GeoTimeConverter};
pub use entity::*;
pub use entity_id::EntityId;
pub use error::*;
pub use fact::{json_type, keys, SceneFact};
pub use message::*;
pub use store::EntityStore;
