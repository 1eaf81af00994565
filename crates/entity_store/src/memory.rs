//! In-memory entity store

use contracts::{
    Dataset, EgoPose, EntityStore, Frame, FrameAnnotation, FrameData, Instance, Log, Sensor,
};

/// Entity collections held in load order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    datasets: Vec<Dataset>,
    ego_poses: Vec<EgoPose>,
    frames: Vec<Frame>,
    frame_data: Vec<FrameData>,
    frame_annotations: Vec<FrameAnnotation>,
    instances: Vec<Instance>,
    logs: Vec<Log>,
    sensors: Vec<Sensor>,
}

impl InMemoryStore {
    /// Start building a store
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }
}

impl EntityStore for InMemoryStore {
    fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    fn ego_poses(&self) -> &[EgoPose] {
        &self.ego_poses
    }

    fn frames(&self) -> &[Frame] {
        &self.frames
    }

    fn frame_data(&self) -> &[FrameData] {
        &self.frame_data
    }

    fn frame_annotations(&self) -> &[FrameAnnotation] {
        &self.frame_annotations
    }

    fn instances(&self) -> &[Instance] {
        &self.instances
    }

    fn logs(&self) -> &[Log] {
        &self.logs
    }

    fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }
}

/// Builder for [`InMemoryStore`], used by the file loader and by fixtures
#[derive(Debug, Default)]
pub struct StoreBuilder {
    store: InMemoryStore,
}

impl StoreBuilder {
    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.store.datasets.push(dataset);
        self
    }

    pub fn ego_pose(mut self, ego_pose: EgoPose) -> Self {
        self.store.ego_poses.push(ego_pose);
        self
    }

    pub fn frame(mut self, frame: Frame) -> Self {
        self.store.frames.push(frame);
        self
    }

    pub fn frame_data(mut self, frame_data: FrameData) -> Self {
        self.store.frame_data.push(frame_data);
        self
    }

    pub fn frame_annotation(mut self, annotation: FrameAnnotation) -> Self {
        self.store.frame_annotations.push(annotation);
        self
    }

    pub fn instance(mut self, instance: Instance) -> Self {
        self.store.instances.push(instance);
        self
    }

    pub fn log(mut self, log: Log) -> Self {
        self.store.logs.push(log);
        self
    }

    pub fn sensor(mut self, sensor: Sensor) -> Self {
        self.store.sensors.push(sensor);
        self
    }

    /// Replace whole collections at once
    pub fn datasets(mut self, datasets: Vec<Dataset>) -> Self {
        self.store.datasets = datasets;
        self
    }

    pub fn ego_poses(mut self, ego_poses: Vec<EgoPose>) -> Self {
        self.store.ego_poses = ego_poses;
        self
    }

    pub fn frames(mut self, frames: Vec<Frame>) -> Self {
        self.store.frames = frames;
        self
    }

    pub fn frame_data_list(mut self, frame_data: Vec<FrameData>) -> Self {
        self.store.frame_data = frame_data;
        self
    }

    pub fn frame_annotations(mut self, annotations: Vec<FrameAnnotation>) -> Self {
        self.store.frame_annotations = annotations;
        self
    }

    pub fn instances(mut self, instances: Vec<Instance>) -> Self {
        self.store.instances = instances;
        self
    }

    pub fn logs(mut self, logs: Vec<Log>) -> Self {
        self.store.logs = logs;
        self
    }

    pub fn sensors(mut self, sensors: Vec<Sensor>) -> Self {
        self.store.sensors = sensors;
        self
    }

    pub fn build(self) -> InMemoryStore {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let store = InMemoryStore::builder()
            .log(Log {
                uuid: "log-1".into(),
                location: "pangyo".into(),
            })
            .log(Log {
                uuid: "log-2".into(),
                location: "sangam".into(),
            })
            .build();

        let ids: Vec<&str> = store.logs().iter().map(|l| l.uuid.as_str()).collect();
        assert_eq!(ids, vec!["log-1", "log-2"]);
        assert_eq!(store.entity_count(), 2);
        assert!(store.frame_data().is_empty());
    }
}
