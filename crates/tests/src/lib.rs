//! # Integration Tests
//!
//! End-to-end scenarios across crates:
//! entity directory → store → join → assemble → dispatch.

#[cfg(test)]
mod scene {
    use std::fs;
    use std::path::Path;

    /// Two camera frames of one drive.
    ///
    /// - `fd1` has a moving truck and a pedestrian
    /// - `fd2` has a barrier plus one annotation whose instance is missing
    /// - `fd3` points at a frame that does not exist
    pub fn write(dir: &Path) {
        let files = [
            (
                "dataset.json",
                r#"[{"uuid":"ds1","log_uuid":"log1","scenario_names":["merge","cut_in"]}]"#,
            ),
            (
                "ego_pose.json",
                r#"[
                    {"uuid":"ep1","timestamp":1532402927647951,
                     "translation":[326865.278,4147694.51,49.126],"rotation":[1,0,0,0]},
                    {"uuid":"ep2","timestamp":"1532402928147951",
                     "translation":[326870.0,4147700.0,49.5],"rotation":[1,0,0,0]}
                ]"#,
            ),
            (
                "frame.json",
                r#"[{"uuid":"f1","dataset_uuid":"ds1"},{"uuid":"f2","dataset_uuid":"ds1"}]"#,
            ),
            (
                "frame_data.json",
                r#"[
                    {"uuid":"fd1","frame_uuid":"f1","ego_pose_uuid":"ep1","sensor_uuid":"s1"},
                    {"uuid":"fd2","frame_uuid":"f2","ego_pose_uuid":"ep2","sensor_uuid":"s1"},
                    {"uuid":"fd3","frame_uuid":"f9","ego_pose_uuid":"ep2","sensor_uuid":"s1"}
                ]"#,
            ),
            (
                "frame_annotation.json",
                r#"[
                    {"uuid":"a1","frame_data_uuid":"fd1","instance_uuid":"i1",
                     "attribute":{"vehicle_state":"moving"},"visibility_level":3},
                    {"uuid":"a2","frame_data_uuid":"fd1","instance_uuid":"i2",
                     "attribute":null,"visibility_level":2},
                    {"uuid":"a3","frame_data_uuid":"fd2","instance_uuid":"i3",
                     "attribute":{"vehicle_state":"stopped"},"visibility_level":4},
                    {"uuid":"a4","frame_data_uuid":"fd2","instance_uuid":"i404"},
                    {"uuid":"a5","frame_data_uuid":"fd3","instance_uuid":"i1"}
                ]"#,
            ),
            (
                "instance.json",
                r#"[
                    {"uuid":"i1","category_name":"dynamic_object.vehicle.truck"},
                    {"uuid":"i2","category_name":"dynamic_object.human.pedestrian"},
                    {"uuid":"i3","category_name":"movable_object.barrier"}
                ]"#,
            ),
            ("log.json", r#"[{"uuid":"log1","location":"seoul-gangnam"}]"#),
            (
                "sensor.json",
                r#"[{"uuid":"s1","name":"CAM_FRONT","rotation":[1,0,0,0]}]"#,
            ),
        ];
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use assembler::{build_messages, AssemblyContext};
    use contracts::{
        AdvisoryMessage, AlertMessage, ContractError, JoinConfig, MessageFamily, MsgCount,
    };
    use dispatcher::{
        BincodeCodec, DispatchState, Dispatcher, DispatcherConfig, DispatcherError, JsonCodec,
    };
    use entity_store::JsonDirectoryLoader;
    use geo_convert::StandardConverter;
    use join_engine::JoinEngine;
    use tempfile::TempDir;

    use super::scene;

    fn scene_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        scene::write(dir.path());
        dir
    }

    fn build(dir: &TempDir, family: MessageFamily, start: MsgCount) -> Vec<String> {
        let (store, _) = JsonDirectoryLoader::load(dir.path()).unwrap();
        let facts = JoinEngine::default().join(&store).facts;
        let converter = StandardConverter::new();
        let ctx = AssemblyContext::new(&converter, 52);
        build_messages(family, &facts, &ctx, start).messages
    }

    #[test]
    fn test_join_counts_linkage_gaps() {
        let dir = scene_dir();
        let (store, load) = JsonDirectoryLoader::load(dir.path()).unwrap();
        assert_eq!(load.total(), 18);

        let output = JoinEngine::default().join(&store);
        assert_eq!(output.facts.len(), 3);
        assert_eq!(output.stats.frame_data_skipped, 1);
        assert_eq!(output.stats.annotations_skipped, 1);
        assert_eq!(output.stats.linkage_gaps(), 2);
    }

    #[test]
    fn test_malformed_values_drop_only_their_messages() {
        let dir = scene_dir();
        std::fs::write(
            dir.path().join("ego_pose.json"),
            r#"[
                {"uuid":"ep1","timestamp":1532402927647951,
                 "translation":[326865.278,4147694.51,49.126],"rotation":[1,0,0,0]},
                {"uuid":"ep2","timestamp":"1532402928147951",
                 "translation":[326865.278,null,49.126],"rotation":[1,0,0,0]}
            ]"#,
        )
        .unwrap();
        let annotations = std::fs::read_to_string(dir.path().join("frame_annotation.json"))
            .unwrap()
            .replace(r#""visibility_level":2"#, r#""visibility_level":"high""#);
        std::fs::write(dir.path().join("frame_annotation.json"), annotations).unwrap();

        let (store, load) = JsonDirectoryLoader::load(dir.path()).unwrap();
        assert_eq!(load.total(), 18);

        let output = JoinEngine::default().join(&store);
        // a2 has a text level, a3 and a4 sit behind the null coordinate
        assert_eq!(output.facts.len(), 1);
        assert_eq!(output.stats.field_failures, 3);

        let messages = build(&dir, MessageFamily::Alert, MsgCount::ZERO);
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_parallel_join_matches_sequential() {
        let dir = scene_dir();
        let (store, _) = JsonDirectoryLoader::load(dir.path()).unwrap();

        let parallel = JoinEngine::new(JoinConfig { parallel: true }).join(&store);
        let sequential = JoinEngine::new(JoinConfig { parallel: false }).join(&store);
        assert_eq!(parallel.facts, sequential.facts);
        assert_eq!(parallel.stats, sequential.stats);
    }

    #[test]
    fn test_alert_messages_from_scene() {
        let dir = scene_dir();
        let messages = build(&dir, MessageFamily::Alert, MsgCount::ZERO);
        assert_eq!(messages.len(), 3);

        let alerts: Vec<AlertMessage> = messages
            .iter()
            .map(|m| serde_json::from_str(m).unwrap())
            .collect();

        assert_eq!(
            alerts.iter().map(|a| a.msg_cnt.value()).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(alerts[0].description, vec![545, 258]);
        // null attribute suppresses the state code
        assert_eq!(alerts[1].description, vec![1542]);
        assert_eq!(alerts[2].description, vec![770, 532]);

        assert_eq!(alerts[0].time_stamp, 293_968);
        assert_eq!(alerts[0].heading, "0010");
        assert_eq!(alerts[0].regional[0].reg_ext_value.cits.stop_id, "seoul-gangnam");
        assert_eq!(alerts[2].regional[0].reg_ext_value.cits.text, "fd2");
    }

    #[test]
    fn test_advisory_counter_wraps() {
        let dir = scene_dir();
        let start = MsgCount::new(127).unwrap();
        let messages = build(&dir, MessageFamily::Advisory, start);

        let advisories: Vec<AdvisoryMessage> = messages
            .iter()
            .map(|m| serde_json::from_str(m).unwrap())
            .collect();
        assert_eq!(
            advisories.iter().map(|a| a.msg_cnt.value()).collect::<Vec<_>>(),
            vec![127, 0, 1]
        );
        assert_eq!(advisories[0].data_frames[0].regions[0].direction, "0038");
    }

    #[test]
    fn test_missing_file_fails_bootstrap() {
        let dir = scene_dir();
        std::fs::remove_file(dir.path().join("sensor.json")).unwrap();

        let mut dispatcher = Dispatcher::new(DispatcherConfig::default(), JsonCodec::new());
        let err = dispatcher
            .start(|| {
                JsonDirectoryLoader::load(dir.path())?;
                Ok(Vec::new())
            })
            .unwrap_err();

        match err {
            DispatcherError::Bootstrap(ContractError::StoreBootstrap { message, .. }) => {
                assert!(message.contains("sensor.json"), "got: {message}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_run() {
        let dir = scene_dir();
        let toml = format!(
            "[source]\ndata_dir = \"{}\"\n\n[join]\nparallel = false\n\n\
             [publisher]\nfamily = \"advisory\"\ninterval_ms = 250\ninitial_msg_count = 5\n\n\
             [codec]\nkind = \"json\"\n",
            dir.path().display()
        );
        let blueprint =
            config_loader::ConfigLoader::load_from_str(&toml, config_loader::ConfigFormat::Toml)
                .unwrap();
        let publisher = &blueprint.publisher;

        let converter = StandardConverter::new();
        let mut dispatcher = Dispatcher::new(
            DispatcherConfig::from(publisher),
            dispatcher::codec_for(blueprint.codec.kind),
        );
        let total = dispatcher
            .start(|| {
                let (store, _) = JsonDirectoryLoader::load(&blueprint.source.data_dir)?;
                let facts = JoinEngine::new(blueprint.join).join(&store).facts;
                let ctx = AssemblyContext::new(&converter, publisher.utm_zone);
                Ok(build_messages(publisher.family, &facts, &ctx, publisher.initial_msg_count)
                    .messages)
            })
            .unwrap();
        assert_eq!(total, 3);

        let started = tokio::time::Instant::now();
        let report = dispatcher.run().await.unwrap();
        assert_eq!(report.family, MessageFamily::Advisory);
        assert_eq!(report.sent, 3);
        let elapsed = started.elapsed();
        assert!(
            elapsed >= Duration::from_millis(750) && elapsed < Duration::from_millis(1000),
            "elapsed: {elapsed:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_publication_drains() {
        let dir = scene_dir();
        let messages = build(&dir, MessageFamily::Alert, MsgCount::ZERO);

        let config = DispatcherConfig {
            family: MessageFamily::Alert,
            interval: Duration::from_millis(500),
        };
        let mut dispatcher = Dispatcher::new(config, BincodeCodec::new());
        dispatcher.start_with(messages).unwrap();

        let report = dispatcher.run().await.unwrap();
        assert_eq!(report.state, DispatchState::Drained);
        assert_eq!(report.total, 3);
        assert_eq!(report.sent, 3);
        assert_eq!(report.failures, 0);
        assert_eq!(report.codec_latency_ms.count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_mid_run_reports_cursor() {
        let dir = scene_dir();
        let messages = build(&dir, MessageFamily::Advisory, MsgCount::ZERO);

        let config = DispatcherConfig {
            family: MessageFamily::Advisory,
            interval: Duration::from_secs(1),
        };
        let mut dispatcher = Dispatcher::new(config, JsonCodec::new());
        dispatcher.start_with(messages).unwrap();
        let handle = dispatcher.spawn();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(handle.metrics().snapshot().cursor, 1);

        let report = handle.stop().await.unwrap();
        assert_eq!(report.cursor, 1);
        assert_eq!(report.state, DispatchState::Running);
    }
}
