//! JSON directory loader
//!
//! Reads one JSON array file per entity type. Any failure aborts the load;
//! a partially populated store is never returned.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::error::{Result, StoreError};
use crate::memory::InMemoryStore;
use crate::stats::LoadStats;

pub const DATASET_FILE: &str = "dataset.json";
pub const EGO_POSE_FILE: &str = "ego_pose.json";
pub const FRAME_FILE: &str = "frame.json";
pub const FRAME_DATA_FILE: &str = "frame_data.json";
pub const FRAME_ANNOTATION_FILE: &str = "frame_annotation.json";
pub const INSTANCE_FILE: &str = "instance.json";
pub const LOG_FILE: &str = "log.json";
pub const SENSOR_FILE: &str = "sensor.json";

/// All files the loader expects, in load order
pub const ENTITY_FILES: [&str; 8] = [
    DATASET_FILE,
    EGO_POSE_FILE,
    FRAME_FILE,
    FRAME_DATA_FILE,
    FRAME_ANNOTATION_FILE,
    INSTANCE_FILE,
    LOG_FILE,
    SENSOR_FILE,
];

/// Loads an [`InMemoryStore`] from a directory of entity files.
pub struct JsonDirectoryLoader;

impl JsonDirectoryLoader {
    /// Load all eight collections from `dir`
    ///
    /// # Errors
    /// - `dir` does not exist or is not a directory
    /// - an entity file is missing or unreadable
    /// - an entity file is not a JSON array of the expected shape
    #[instrument(name = "store_load", skip_all, fields(dir = %dir.display()))]
    pub fn load(dir: &Path) -> Result<(InMemoryStore, LoadStats)> {
        if !dir.is_dir() {
            return Err(StoreError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let store = InMemoryStore::builder()
            .datasets(read_collection(dir, DATASET_FILE)?)
            .ego_poses(read_collection(dir, EGO_POSE_FILE)?)
            .frames(read_collection(dir, FRAME_FILE)?)
            .frame_data_list(read_collection(dir, FRAME_DATA_FILE)?)
            .frame_annotations(read_collection(dir, FRAME_ANNOTATION_FILE)?)
            .instances(read_collection(dir, INSTANCE_FILE)?)
            .logs(read_collection(dir, LOG_FILE)?)
            .sensors(read_collection(dir, SENSOR_FILE)?)
            .build();

        let stats = LoadStats::of(&store);
        record_stats(&stats);
        info!(total = stats.total(), %stats, "Entity store loaded");

        Ok((store, stats))
    }

    /// Files missing from `dir`, without reading any of them
    pub fn missing_files(dir: &Path) -> Vec<PathBuf> {
        ENTITY_FILES
            .iter()
            .map(|name| dir.join(name))
            .filter(|path| !path.is_file())
            .collect()
    }
}

fn read_collection<T: DeserializeOwned>(dir: &Path, file_name: &str) -> Result<Vec<T>> {
    let path = dir.join(file_name);
    let file = File::open(&path).map_err(|source| StoreError::ReadFailed {
        path: path.clone(),
        source,
    })?;

    let items: Vec<T> = serde_json::from_reader(BufReader::new(file))
        .map_err(|source| StoreError::ParseFailed {
            path: path.clone(),
            source,
        })?;

    debug!(file = file_name, count = items.len(), "Entity file parsed");
    Ok(items)
}

fn record_stats(stats: &LoadStats) {
    let per_entity = [
        ("dataset", stats.datasets),
        ("ego_pose", stats.ego_poses),
        ("frame", stats.frames),
        ("frame_data", stats.frame_data),
        ("frame_annotation", stats.frame_annotations),
        ("instance", stats.instances),
        ("log", stats.logs),
        ("sensor", stats.sensors),
    ];
    for (entity, count) in per_entity {
        observability::record_entities_loaded(entity, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::EntityStore;
    use std::fs;
    use tempfile::TempDir;

    fn write_minimal(dir: &Path) {
        let files = [
            (DATASET_FILE, r#"[{"uuid":"ds1","log_uuid":"log1","scenario_names":["merge"]}]"#),
            (
                EGO_POSE_FILE,
                r#"[{"uuid":"ep1","timestamp":1532402927647951,
                    "translation":[326865.278,4147694.51,49.126],
                    "rotation":[0.57,-0.01,0.01,-0.82]}]"#,
            ),
            (FRAME_FILE, r#"[{"uuid":"f1","dataset_uuid":"ds1"}]"#),
            (
                FRAME_DATA_FILE,
                r#"[{"uuid":"fd1","frame_uuid":"f1","ego_pose_uuid":"ep1","sensor_uuid":"s1"}]"#,
            ),
            (
                FRAME_ANNOTATION_FILE,
                r#"[{"uuid":"a1","frame_data_uuid":"fd1","instance_uuid":"i1",
                    "attribute":{"vehicle_state":"moving"},"visibility_level":3}]"#,
            ),
            (INSTANCE_FILE, r#"[{"uuid":"i1","category_name":"dynamic_object.vehicle.truck"}]"#),
            (LOG_FILE, r#"[{"uuid":"log1","location":"seoul-gangnam"}]"#),
            (SENSOR_FILE, r#"[{"uuid":"s1","name":"CAM_FRONT","rotation":[1,0,0,0]}]"#),
        ];
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
    }

    #[test]
    fn test_load_minimal_directory() {
        let dir = TempDir::new().unwrap();
        write_minimal(dir.path());

        let (store, stats) = JsonDirectoryLoader::load(dir.path()).unwrap();
        assert_eq!(stats.total(), 8);
        assert_eq!(stats.frame_annotations, 1);
        assert_eq!(store.frame_data()[0].ego_pose_uuid, "ep1");
        assert_eq!(store.ego_poses()[0].timestamp, "1532402927647951");
        assert_eq!(store.sensors()[0].rotation, serde_json::json!([1, 0, 0, 0]));
    }

    #[test]
    fn test_malformed_record_values_keep_file_loadable() {
        let dir = TempDir::new().unwrap();
        write_minimal(dir.path());
        fs::write(
            dir.path().join(EGO_POSE_FILE),
            r#"[{"uuid":"ep1","timestamp":1,"translation":[326865.278,4147694.51,49.126],
                 "rotation":[1,0,0,0]},
                {"uuid":"ep2","timestamp":2,"translation":[326865.278,null,49.126],
                 "rotation":[1,0,0,0]}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(FRAME_ANNOTATION_FILE),
            r#"[{"uuid":"a1","frame_data_uuid":"fd1","instance_uuid":"i1","visibility_level":3},
                {"uuid":"a2","frame_data_uuid":"fd1","instance_uuid":"i1",
                 "visibility_level":"high"}]"#,
        )
        .unwrap();

        let (store, stats) = JsonDirectoryLoader::load(dir.path()).unwrap();
        assert_eq!(stats.ego_poses, 2);
        assert_eq!(stats.frame_annotations, 2);
        assert!(store.ego_poses()[1].translation[1].is_null());
        assert_eq!(store.frame_annotations()[1].visibility_level, "high");
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = JsonDirectoryLoader::load(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, StoreError::DirectoryNotFound { .. }), "got: {err}");
    }

    #[test]
    fn test_missing_file_is_named() {
        let dir = TempDir::new().unwrap();
        write_minimal(dir.path());
        fs::remove_file(dir.path().join(LOG_FILE)).unwrap();

        let err = JsonDirectoryLoader::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("log.json"), "got: {err}");
        assert_eq!(JsonDirectoryLoader::missing_files(dir.path()).len(), 1);
    }

    #[test]
    fn test_malformed_file_is_bootstrap_failure() {
        let dir = TempDir::new().unwrap();
        write_minimal(dir.path());
        fs::write(dir.path().join(FRAME_FILE), r#"{"uuid":"f1"}"#).unwrap();

        let err = JsonDirectoryLoader::load(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::ParseFailed { .. }), "got: {err}");

        let contract: contracts::ContractError = err.into();
        assert!(matches!(contract, contracts::ContractError::StoreBootstrap { .. }));
        assert!(!contract.is_per_record());
    }
}
