//! # Join Engine
//!
//! Rebuilds one flat [`SceneFact`](contracts::SceneFact) per resolvable
//! (FrameData, FrameAnnotation) pair.
//!
//! - Identifier indexes per entity type, first-seen entity wins
//! - Schema-declared flattening into `"<entity>_<field>"` keys
//! - Optional per-FrameData parallelism on the rayon pool
//!
//! Broken foreign-key chains are filtered and counted, never raised.
//! Malformed fields drop only the affected fact.
//!
//! ```ignore
//! use join_engine::JoinEngine;
//!
//! let output = JoinEngine::default().join(&store);
//! println!("{} facts", output.facts.len());
//! ```

mod engine;
mod index;
mod schema;

pub use contracts::{JoinConfig, SceneFact};
pub use engine::{JoinEngine, JoinOutput, JoinStats};
pub use index::{EntityIndex, JoinIndexes};
pub use schema::{fact_key, fact_keys, flatten_into, FieldSpec, FlattenSchema};

/// Join with the default configuration, facts only
pub fn join(store: &dyn contracts::EntityStore) -> Vec<SceneFact> {
    JoinEngine::default().join(store).facts
}
