//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 读数 → 重建 → 分析 → 用时差 的端到端流程
//! - 持久化格式与会话配置

#[cfg(test)]
mod contract_tests {
    use contracts::{ReconstructionConfig, DEFAULT_PLAUSIBLE_SPEEDS_KMH};

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_default_reconstruction_settings() {
        let config = ReconstructionConfig::default();
        assert_eq!(config.outlier_threshold_kmh, 50.0);
        assert_eq!(config.plausible_speeds_kmh, DEFAULT_PLAUSIBLE_SPEEDS_KMH.to_vec());
        assert_eq!(config.slope_window, 5);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use contracts::{RawReading, ReconstructionConfig, TelemetrySeries};
    use ingestion::{
        reconstruct, RecognizedReadings, ReconstructionWorker, ScriptedFrames, ScriptedReadings,
        ScriptedRecognizer, TelemetryBuilder,
    };
    use observability::SeriesStatsAggregator;
    use rand::Rng;
    use sync_engine::{ComparisonSession, DistanceAnalyzer, SyncError};

    /// `count` frames at a constant reading
    fn constant_run(count: u64, speed: f64, frame_rate: f64) -> TelemetrySeries {
        let values = vec![Some(speed); count as usize];
        reconstruct(
            ScriptedReadings::from_values(0, &values),
            &ReconstructionConfig::with_frame_rate(frame_rate),
        )
    }

    /// End-to-end: scripted readings -> builder -> analyzer -> synchronizer
    #[test]
    fn test_e2e_constant_speed_runs() {
        // 72 km/h = 20 m/s and 36 km/h = 10 m/s, one sample per second
        let fast = DistanceAnalyzer::new("fast", constant_run(11, 72.0, 1.0));
        let slow = DistanceAnalyzer::new("slow", constant_run(11, 36.0, 1.0));

        let delta = sync_engine::time_delta(&fast, &slow, 0.0, 100.0).unwrap();
        assert!((delta.elapsed_a - 5.0).abs() < 1e-9, "elapsed_a = {}", delta.elapsed_a);
        assert!((delta.elapsed_b - 10.0).abs() < 1e-9, "elapsed_b = {}", delta.elapsed_b);
        assert!((delta.delta + 5.0).abs() < 1e-9);
        assert_eq!(delta.to_string(), "Δt = t1 - t2 = 5.000 - 10.000 = -5.000 s");
    }

    #[test]
    fn test_e2e_ocr_misreads_are_corrected() {
        let frames = ScriptedFrames::new(100, 6);
        let recognizer = ScriptedRecognizer::new(vec![
            Some("60"),
            Some("61 km/h"),
            Some("250"),
            None,
            Some("garbage"),
            Some("62"),
        ]);
        let series = reconstruct(
            RecognizedReadings::new(frames, recognizer),
            &ReconstructionConfig::default(),
        );

        // the jump back up from the 0 sentinel is treated as a misread as well
        let speeds: Vec<f64> = series.iter().map(|s| s.speed).collect();
        assert_eq!(speeds, vec![60.0, 61.0, 65.0, 0.0, 0.0, 65.0]);
        assert_eq!(series.initial_frame(), Some(100));

        let distances: Vec<f64> = series.iter().map(|s| s.distance).collect();
        assert!(
            distances.windows(2).all(|w| w[1] >= w[0]),
            "distance must not decrease: {distances:?}"
        );
    }

    #[test]
    fn test_e2e_random_readings_monotonic_distance() {
        let mut rng = rand::rng();
        let mut builder = TelemetryBuilder::new(&ReconstructionConfig::default());
        for frame in 0..500u64 {
            let raw = if rng.random_bool(0.1) {
                None
            } else {
                Some(rng.random_range(0.0..260.0))
            };
            builder.process(frame, raw);
        }
        let series = builder.finalize();

        assert_eq!(series.len(), 500);
        for pair in series.samples().windows(2) {
            assert!(pair[1].distance >= pair[0].distance);
            assert!(pair[1].time > pair[0].time);
        }
        assert!(series.iter().all(|s| s.acceleration.is_finite()));
    }

    #[test]
    fn test_e2e_recalibration_changes_delta() {
        let mut session = ComparisonSession::new(&contracts::AnalysisConfig { nudge_step_m: 10.0 });
        session
            .add(DistanceAnalyzer::new("a", constant_run(21, 36.0, 1.0)))
            .unwrap();
        session
            .add(DistanceAnalyzer::new("b", constant_run(21, 36.0, 1.0)))
            .unwrap();

        let before = session.time_delta(0.0, 100.0).unwrap();
        assert!(before.delta.abs() < 1e-9);

        // b starts 20 m later, so only 80 m of it lie inside the window
        session.select("b").unwrap();
        assert_eq!(session.nudge_selected(2).unwrap(), 20.0);
        let after = session.time_delta(0.0, 100.0).unwrap();
        assert!((after.delta - 2.0).abs() < 1e-9, "delta = {}", after.delta);
    }

    #[test]
    fn test_e2e_insufficient_selection() {
        let a = DistanceAnalyzer::new("a", constant_run(11, 36.0, 1.0));
        let b = DistanceAnalyzer::new("b", constant_run(11, 36.0, 1.0));

        let err = sync_engine::time_delta(&a, &b, 200.0, 300.0).unwrap_err();
        assert!(matches!(err, SyncError::InsufficientData { samples: 0, .. }));
    }

    #[tokio::test]
    async fn test_e2e_worker_progress_and_summary() {
        let handle = ReconstructionWorker::new(ReconstructionConfig::default())
            .with_progress_capacity(64)
            .spawn(ScriptedReadings::from_values(0, &[Some(36.0); 31]))
            .unwrap();

        let progress = handle.progress();
        let mut frames = Vec::new();
        while let Ok(update) = progress.recv().await {
            observability::record_reconstruction_progress(update.frames_processed, update.total);
            frames.push(update.frames_processed);
        }
        assert_eq!(frames, (1..=31).collect::<Vec<u64>>());

        let outcome = tokio::task::spawn_blocking(move || handle.join())
            .await
            .unwrap()
            .unwrap();
        assert!(!outcome.is_cancelled());

        let series = outcome.into_series();
        observability::record_series_loaded("steady", series.len());
        let summary = SeriesStatsAggregator::from_series(&series).summary();
        assert_eq!(summary.total_samples, 31);
        assert_eq!(summary.zero_speed_samples, 0);
        // 10 m/s for 1 s at 30 fps
        assert!((summary.span_m - 10.0).abs() < 1e-9);
        assert!((summary.duration_s - 1.0).abs() < 1e-9);
        assert!((summary.speed_kmh.mean - 36.0).abs() < 1e-9);
        assert!(summary.acceleration_g.max.abs() < 1e-9);
    }

    #[test]
    fn test_e2e_worker_cancellation() {
        let readings: Vec<RawReading> =
            (0..50_000).map(|i| RawReading::new(i, Some(40.0))).collect();
        let source = ScriptedReadings::new(readings).with_delay(Duration::from_millis(1));
        let handle = ReconstructionWorker::new(ReconstructionConfig::default())
            .spawn(source)
            .unwrap();

        std::thread::sleep(Duration::from_millis(50));
        handle.stop();
        let outcome = handle.join().unwrap();

        assert!(outcome.is_cancelled());
        let series = outcome.into_series();
        assert!(!series.is_empty() && series.len() < 50_000);

        // a cancelled prefix is still a usable series
        let analyzer = DistanceAnalyzer::new("partial", series);
        assert_eq!(analyzer.initial_frame(), Some(0));
    }
}

#[cfg(test)]
mod persistence_tests {
    use config_loader::ConfigLoader;
    use contracts::ReconstructionConfig;
    use ingestion::{reconstruct, rebuild_series};
    use series_io::{load_series, save_readings, save_series, ReadingsReplay};

    #[test]
    fn test_readings_replay_to_series_file() {
        let dir = tempfile::tempdir().unwrap();
        let readings_path = dir.path().join("readings.csv");
        let series_path = dir.path().join("series.csv");

        let readings: Vec<contracts::RawReading> = (0..10)
            .map(|i| contracts::RawReading::new(i, if i == 4 { None } else { Some(54.0) }))
            .collect();
        save_readings(&readings_path, &readings).unwrap();

        let replay = ReadingsReplay::open(&readings_path).unwrap();
        let series = reconstruct(replay, &ReconstructionConfig::with_frame_rate(2.0));
        save_series(&series_path, &series).unwrap();

        let header = std::fs::read_to_string(&series_path).unwrap();
        assert!(header.starts_with("frame,speed,distance,time,accel"));

        let loaded = load_series(&series_path).unwrap();
        assert_eq!(loaded.len(), 10);
        assert_eq!(loaded.samples()[4].speed, 0.0);
        for (saved, read) in series.iter().zip(loaded.iter()) {
            assert_eq!(saved.frame_index, read.frame_index);
            assert!((saved.distance - read.distance).abs() < 5e-4);
        }
    }

    #[test]
    fn test_rebuild_after_manual_edit() {
        let series = reconstruct(
            ingestion::ScriptedReadings::from_values(0, &[Some(36.0), Some(0.0), Some(36.0)]),
            &ReconstructionConfig::with_frame_rate(1.0),
        );
        // the dropout at frame 1 is fixed by hand
        let mut samples = series.into_samples();
        samples[1].speed = 36.0;

        let rebuilt = rebuild_series(&samples, 5);
        assert!((rebuilt.samples()[2].distance - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_session_file_to_comparison() {
        let dir = tempfile::tempdir().unwrap();
        for (name, speed) in [("fast", 72.0), ("slow", 36.0)] {
            let series = reconstruct(
                ingestion::ScriptedReadings::from_values(0, &vec![Some(speed); 11]),
                &ReconstructionConfig::with_frame_rate(1.0),
            );
            save_series(&dir.path().join(format!("{name}.csv")), &series).unwrap();
        }
        let config = dir.path().join("session.toml");
        std::fs::write(
            &config,
            r#"
version = "V1"

[reconstruction]
frame_rate = 1.0

[analysis]
nudge_step_m = 0.5

[[series]]
name = "fast"
path = "fast.csv"

[[series]]
name = "slow"
path = "slow.csv"
"#,
        )
        .unwrap();

        let blueprint = ConfigLoader::load_from_path(&config).unwrap();
        let mut session = sync_engine::ComparisonSession::new(&blueprint.analysis);
        for entry in &blueprint.series {
            let series = load_series(&entry.path).unwrap();
            let mut analyzer = sync_engine::DistanceAnalyzer::new(entry.name.clone(), series);
            analyzer.shift_distance(entry.offset_m);
            session.add(analyzer).unwrap();
        }

        let delta = session.time_delta(100.0, 0.0).unwrap();
        assert!((delta.delta + 5.0).abs() < 1e-6, "delta = {}", delta.delta);

        let readouts = session.hover(40.0);
        assert_eq!(readouts.len(), 2);
        assert_eq!(readouts[0].speed, 72.0);
        assert_eq!(readouts[1].frame_index, 4);
    }
}
