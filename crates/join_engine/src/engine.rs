//! Join engine implementation.

use contracts::{ContractError, EntityStore, FrameData, JoinConfig, SceneFact};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::index::JoinIndexes;
use crate::schema::flatten_into;

/// Counters of one join pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    /// FrameData entries examined
    pub frame_data_seen: u64,
    /// FrameData entries whose Frame/Dataset/Log/EgoPose/Sensor chain broke
    pub frame_data_skipped: u64,
    /// Annotations attached to resolvable FrameData
    pub annotations_seen: u64,
    /// Annotations whose Instance did not resolve
    pub annotations_skipped: u64,
    /// Facts dropped because a present field was malformed
    pub field_failures: u64,
    /// Facts emitted
    pub facts_emitted: u64,
    /// Entities shadowed by an earlier entity with the same uuid
    pub duplicate_ids: u64,
}

impl JoinStats {
    /// Linkage gaps of both kinds
    pub fn linkage_gaps(&self) -> u64 {
        self.frame_data_skipped + self.annotations_skipped
    }

    fn merge(&mut self, other: &JoinStats) {
        self.frame_data_seen += other.frame_data_seen;
        self.frame_data_skipped += other.frame_data_skipped;
        self.annotations_seen += other.annotations_seen;
        self.annotations_skipped += other.annotations_skipped;
        self.field_failures += other.field_failures;
        self.facts_emitted += other.facts_emitted;
    }
}

/// Result of a join pass
#[derive(Debug, Clone, Default)]
pub struct JoinOutput {
    pub facts: Vec<SceneFact>,
    pub stats: JoinStats,
}

#[derive(Default)]
struct Partial {
    facts: Vec<SceneFact>,
    stats: JoinStats,
}

/// Reconstructs scene facts from an entity store
#[derive(Debug, Clone, Copy, Default)]
pub struct JoinEngine {
    config: JoinConfig,
}

impl JoinEngine {
    pub fn new(config: JoinConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> JoinConfig {
        self.config
    }

    /// Join every FrameData with its annotations
    ///
    /// Facts come out in FrameData input order, each FrameData's
    /// annotations contiguous and in their own input order, in both
    /// sequential and parallel mode.
    #[instrument(
        name = "join_engine_join",
        skip(self, store),
        fields(parallel = self.config.parallel, frame_data = store.frame_data().len())
    )]
    pub fn join(&self, store: &dyn EntityStore) -> JoinOutput {
        let indexes = JoinIndexes::build(store);
        let resolve = |frame_data: &FrameData| resolve_frame_data(frame_data, &indexes);

        let partials: Vec<Partial> = if self.config.parallel {
            store.frame_data().par_iter().map(resolve).collect()
        } else {
            store.frame_data().iter().map(resolve).collect()
        };

        let mut output = JoinOutput::default();
        output.stats.duplicate_ids = indexes.duplicates() as u64;
        for partial in partials {
            output.stats.merge(&partial.stats);
            output.facts.extend(partial.facts);
        }

        let stats = &output.stats;
        observability::record_join(stats.facts_emitted, stats.linkage_gaps(), stats.field_failures);
        info!(
            facts = stats.facts_emitted,
            frame_data_skipped = stats.frame_data_skipped,
            annotations_skipped = stats.annotations_skipped,
            field_failures = stats.field_failures,
            duplicate_ids = stats.duplicate_ids,
            "Join completed"
        );

        output
    }
}

fn resolve_frame_data(frame_data: &FrameData, indexes: &JoinIndexes<'_>) -> Partial {
    let mut partial = Partial::default();
    partial.stats.frame_data_seen = 1;

    let chain = (|| {
        let ego_pose = indexes.ego_poses.get(&frame_data.ego_pose_uuid)?;
        let sensor = indexes.sensors.get(&frame_data.sensor_uuid)?;
        let frame = indexes.frames.get(&frame_data.frame_uuid)?;
        let dataset = indexes.datasets.get(&frame.dataset_uuid)?;
        let log = indexes.logs.get(&dataset.log_uuid)?;
        Some((ego_pose, sensor, frame, dataset, log))
    })();

    let Some((ego_pose, sensor, frame, dataset, log)) = chain else {
        debug!(frame_data = %frame_data.uuid, "Linkage gap, FrameData skipped");
        partial.stats.frame_data_skipped = 1;
        return partial;
    };

    let annotations = indexes.annotations_of(&frame_data.uuid);
    partial.stats.annotations_seen = annotations.len() as u64;
    if annotations.is_empty() {
        return partial;
    }

    let base = (|| -> Result<SceneFact, ContractError> {
        let mut fact = SceneFact::new();
        flatten_into(dataset, &mut fact)?;
        flatten_into(ego_pose, &mut fact)?;
        flatten_into(sensor, &mut fact)?;
        flatten_into(frame, &mut fact)?;
        flatten_into(frame_data, &mut fact)?;
        Ok(fact)
    })();

    let base = match base {
        Ok(base) => base,
        Err(err) => {
            warn!(frame_data = %frame_data.uuid, error = %err, "Malformed field, facts dropped");
            partial.stats.field_failures = annotations.len() as u64;
            return partial;
        }
    };

    for annotation in annotations {
        let Some(instance) = indexes.instances.get(&annotation.instance_uuid) else {
            debug!(annotation = %annotation.uuid, "Linkage gap, annotation skipped");
            partial.stats.annotations_skipped += 1;
            continue;
        };

        let mut fact = base.clone();
        let merged = flatten_into(*annotation, &mut fact)
            .and_then(|()| flatten_into(instance, &mut fact))
            .and_then(|()| flatten_into(log, &mut fact));

        match merged {
            Ok(()) => partial.facts.push(fact),
            Err(err) => {
                warn!(annotation = %annotation.uuid, error = %err, "Malformed field, fact dropped");
                partial.stats.field_failures += 1;
            }
        }
    }

    partial.stats.facts_emitted = partial.facts.len() as u64;
    partial
}
