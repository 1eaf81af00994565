//! Load statistics

use std::fmt;

use contracts::EntityStore;
use serde::Serialize;

/// Entity counts per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub datasets: usize,
    pub ego_poses: usize,
    pub frames: usize,
    pub frame_data: usize,
    pub frame_annotations: usize,
    pub instances: usize,
    pub logs: usize,
    pub sensors: usize,
}

impl LoadStats {
    /// Count the collections of any store
    pub fn of(store: &dyn EntityStore) -> Self {
        Self {
            datasets: store.datasets().len(),
            ego_poses: store.ego_poses().len(),
            frames: store.frames().len(),
            frame_data: store.frame_data().len(),
            frame_annotations: store.frame_annotations().len(),
            instances: store.instances().len(),
            logs: store.logs().len(),
            sensors: store.sensors().len(),
        }
    }

    /// Sum over all collections
    pub fn total(&self) -> usize {
        self.datasets
            + self.ego_poses
            + self.frames
            + self.frame_data
            + self.frame_annotations
            + self.instances
            + self.logs
            + self.sensors
    }
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "datasets={} ego_poses={} frames={} frame_data={} \
             frame_annotations={} instances={} logs={} sensors={}",
            self.datasets,
            self.ego_poses,
            self.frames,
            self.frame_data,
            self.frame_annotations,
            self.instances,
            self.logs,
            self.sensors
        )
    }
}
