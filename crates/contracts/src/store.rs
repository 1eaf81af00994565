//! EntityStore trait - read-only access to loaded entities
//!
//! The join engine only ever reads through this trait; how the collections
//! were populated (files, fixtures) is the implementor's concern.

use crate::{Dataset, EgoPose, Frame, FrameAnnotation, FrameData, Instance, Log, Sensor};

/// Read-only store holding the eight entity collections in load order.
///
/// Accessors are pure and may be called any number of times.
pub trait EntityStore: Send + Sync {
    fn datasets(&self) -> &[Dataset];

    fn ego_poses(&self) -> &[EgoPose];

    fn frames(&self) -> &[Frame];

    fn frame_data(&self) -> &[FrameData];

    fn frame_annotations(&self) -> &[FrameAnnotation];

    fn instances(&self) -> &[Instance];

    fn logs(&self) -> &[Log];

    fn sensors(&self) -> &[Sensor];

    /// Total number of entities across all collections
    fn entity_count(&self) -> usize {
        self.datasets().len()
            + self.ego_poses().len()
            + self.frames().len()
            + self.frame_data().len()
            + self.frame_annotations().len()
            + self.instances().len()
            + self.logs().len()
            + self.sensors().len()
    }
}
