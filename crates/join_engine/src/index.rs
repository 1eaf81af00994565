//! Identifier indexes
//!
//! Built once before the join and read-only afterwards.

use std::collections::HashMap;

use contracts::{
    Dataset, EgoPose, Entity, EntityStore, Frame, FrameAnnotation, Instance, Log, Sensor,
};

/// `uuid → entity` for one collection, first occurrence wins
#[derive(Debug)]
pub struct EntityIndex<'a, E> {
    by_id: HashMap<&'a str, &'a E>,
    duplicates: usize,
}

impl<'a, E: Entity> EntityIndex<'a, E> {
    pub fn build(items: &'a [E]) -> Self {
        let mut by_id = HashMap::with_capacity(items.len());
        let mut duplicates = 0;
        for item in items {
            if by_id.contains_key(item.uuid().as_str()) {
                duplicates += 1;
            } else {
                by_id.insert(item.uuid().as_str(), item);
            }
        }
        Self { by_id, duplicates }
    }

    pub fn get(&self, id: &str) -> Option<&'a E> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Entries shadowed by an earlier entity with the same uuid
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// All lookups the join needs
#[derive(Debug)]
pub struct JoinIndexes<'a> {
    pub datasets: EntityIndex<'a, Dataset>,
    pub ego_poses: EntityIndex<'a, EgoPose>,
    pub frames: EntityIndex<'a, Frame>,
    pub instances: EntityIndex<'a, Instance>,
    pub logs: EntityIndex<'a, Log>,
    pub sensors: EntityIndex<'a, Sensor>,
    /// Annotations grouped by `frame_data_uuid`, input order kept per group
    pub annotations: HashMap<&'a str, Vec<&'a FrameAnnotation>>,
}

impl<'a> JoinIndexes<'a> {
    pub fn build(store: &'a dyn EntityStore) -> Self {
        let mut annotations: HashMap<&'a str, Vec<&'a FrameAnnotation>> = HashMap::new();
        for annotation in store.frame_annotations() {
            annotations
                .entry(annotation.frame_data_uuid.as_str())
                .or_default()
                .push(annotation);
        }

        Self {
            datasets: EntityIndex::build(store.datasets()),
            ego_poses: EntityIndex::build(store.ego_poses()),
            frames: EntityIndex::build(store.frames()),
            instances: EntityIndex::build(store.instances()),
            logs: EntityIndex::build(store.logs()),
            sensors: EntityIndex::build(store.sensors()),
            annotations,
        }
    }

    /// Annotations attached to one FrameData
    pub fn annotations_of(&self, frame_data_uuid: &str) -> &[&'a FrameAnnotation] {
        self.annotations
            .get(frame_data_uuid)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Duplicate uuids shadowed across all indexed collections
    pub fn duplicates(&self) -> usize {
        self.datasets.duplicates()
            + self.ego_poses.duplicates()
            + self.frames.duplicates()
            + self.instances.duplicates()
            + self.logs.duplicates()
            + self.sensors.duplicates()
    }
}
