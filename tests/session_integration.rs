//! Integration tests for the design logger
//!
//! Drives full sessions through the public API with a manual clock and a
//! scripted prompt, then checks the files on disk.

use chrono::{DateTime, Duration as ChronoDuration, Local, TimeZone};
use designlogger::{
    clock::ManualClock,
    config::{CsvLayout, FavoriteCapture, LoggerConfig},
    prompt::RecordingPrompt,
    session::{persistence::parse_line, SessionState},
    ComponentInputs, DesignLogger, LoggerError,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn noon() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

struct Harness {
    logger: DesignLogger,
    clock: ManualClock,
    prompt: RecordingPrompt,
    dir: TempDir,
    _runtime: tokio::runtime::Runtime,
}

impl Harness {
    fn new(config: LoggerConfig, prompt: RecordingPrompt) -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let clock = ManualClock::new(noon());
        let logger = DesignLogger::new(
            config,
            Arc::new(prompt.clone()),
            Arc::new(clock.clone()),
            runtime.handle().clone(),
        );
        Self {
            logger,
            clock,
            prompt,
            dir: TempDir::new().unwrap(),
            _runtime: runtime,
        }
    }

    fn accepting() -> Self {
        Self::new(LoggerConfig::default(), RecordingPrompt::accepting())
    }

    fn prefix(&self) -> String {
        format!("{}/", self.dir.path().display())
    }

    fn advance_secs(&self, secs: i64) {
        self.clock.advance(ChronoDuration::seconds(secs));
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).unwrap()
    }
}

#[test]
fn test_participant_scenario() {
    let h = Harness::accepting();
    h.logger.start(7, 1.0, &h.prefix()).unwrap();

    h.advance_secs(2);
    h.logger.record(&[1.0, 2.0], &[0.5], false).unwrap();
    h.advance_secs(3);
    h.logger.record(&[3.0, 4.0], &[0.25], true).unwrap();
    h.advance_secs(4);
    h.logger.record(&[5.0, 6.0], &[0.125], false).unwrap();

    let path = h.logger.end().unwrap().expect("first end writes the log");
    assert_eq!(path, h.dir.path().join("7_120009.csv"));

    let contents = h.read("7_120009.csv");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "1,2,0.5,20240101120002,2,0,1");
    assert_eq!(lines[1], "3,4,0.25,20240101120005,3,1,1");
    assert_eq!(lines[2], "5,6,0.125,20240101120009,4,0,1");

    let favorites = h.logger.favorites();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites.branch(0), Some(&[3.0, 4.0][..]));
}

#[test]
fn test_legacy_favorites_capture_empty_vectors() {
    let mut config = LoggerConfig::default();
    config.session.favorite_capture = FavoriteCapture::LegacyEmpty;
    let h = Harness::new(config, RecordingPrompt::accepting());
    h.logger.start(7, 1.0, &h.prefix()).unwrap();

    h.advance_secs(1);
    h.logger.record(&[3.0, 4.0], &[0.25], true).unwrap();

    let favorites = h.logger.favorites();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites.branch(0), Some(&[][..]));
    assert!(h.logger.rows()[0].favorite);
}

#[test]
fn test_end_twice_exports_once() {
    let h = Harness::accepting();
    h.logger.start(1, 1.0, &h.prefix()).unwrap();
    h.advance_secs(1);
    h.logger.record(&[1.0], &[1.0], false).unwrap();

    let first = h.logger.end().unwrap();
    h.advance_secs(5);
    let second = h.logger.end().unwrap();

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(h.prompt.notifications().len(), 1);

    let csv_files: Vec<_> = fs::read_dir(h.dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "csv"))
        .collect();
    assert_eq!(csv_files.len(), 1);
}

#[test]
fn test_record_before_start_is_rejected() {
    let h = Harness::accepting();
    let err = h.logger.record(&[1.0], &[], false).unwrap_err();
    assert!(matches!(err, LoggerError::UninitializedSession));
    assert!(h.logger.rows().is_empty());
}

#[test]
fn test_declined_start_via_solve_is_silent() {
    let h = Harness::new(LoggerConfig::default(), RecordingPrompt::declining());
    let inputs = ComponentInputs {
        start: true,
        participant: 2,
        log_path: h.prefix(),
        design_vector: vec![1.0],
        favorite: true,
        ..ComponentInputs::default()
    };

    let out = h.logger.solve(&inputs).unwrap();
    assert!(out.is_empty());
    assert_eq!(h.logger.state(), SessionState::Idle);
    assert_eq!(h.prompt.confirmations().len(), 1);

    // The host re-invokes and the user is asked again
    h.logger.solve(&inputs).unwrap();
    assert_eq!(h.prompt.confirmations().len(), 2);
}

#[test]
fn test_solve_dedupes_same_second() {
    let h = Harness::accepting();
    let mut inputs = ComponentInputs {
        start: true,
        participant: 4,
        log_path: h.prefix(),
        design_vector: vec![1.0],
        ..ComponentInputs::default()
    };

    h.advance_secs(1);
    h.logger.solve(&inputs).unwrap();
    h.clock.advance(ChronoDuration::milliseconds(300));
    inputs.design_vector = vec![2.0];
    inputs.favorite = true;
    let out = h.logger.solve(&inputs).unwrap();

    let rows = h.logger.rows();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].favorite);
    assert_eq!(rows[0].design_vector, vec![1.0]);
    assert_eq!(out.branch(0), Some(&[2.0][..]));
}

#[test]
fn test_autosave_now_writes_backup() {
    let h = Harness::accepting();
    h.logger.start(9, 1.0, &h.prefix()).unwrap();
    h.advance_secs(1);
    h.logger.record(&[1.0, 2.0], &[0.5], false).unwrap();

    let path = h.logger.autosave_now().unwrap();
    assert_eq!(path, h.dir.path().join("9_Backup.csv"));
    assert_eq!(h.read("9_Backup.csv"), "1,2,0.5,20240101120001,1,0,1\n");

    h.advance_secs(1);
    h.logger.record(&[3.0], &[0.1], false).unwrap();
    h.logger.autosave_now().unwrap();
    assert_eq!(h.read("9_Backup.csv").lines().count(), 2);
}

#[test]
fn test_compact_layout() {
    let mut config = LoggerConfig::default();
    config.export.layout = CsvLayout::Compact;
    let h = Harness::new(config, RecordingPrompt::accepting());
    h.logger.start(5, 1.0, &h.prefix()).unwrap();
    h.advance_secs(1);
    h.logger.record(&[1.0], &[2.0], true).unwrap();

    let path = h.logger.end().unwrap().unwrap();
    let contents = fs::read_to_string(path).unwrap();
    assert_eq!(contents, "1,2,20240101120001,1\n");
}

#[test]
fn test_failed_final_export_still_ends_session() {
    let h = Harness::accepting();
    let missing = format!("{}missing/", h.prefix());
    h.logger.start(1, 1.0, &missing).unwrap();
    h.advance_secs(1);
    h.logger.record(&[1.0], &[], false).unwrap();

    let err = h.logger.end().unwrap_err();
    assert!(matches!(err, LoggerError::ExportIo { .. }));
    assert_eq!(h.logger.state(), SessionState::Ended);
    assert!(!h.logger.timers_armed());
    assert!(h.prompt.notifications().is_empty());
}

#[test]
fn test_csv_round_trip() {
    let h = Harness::accepting();
    h.logger.start(1, 1.0, &h.prefix()).unwrap();
    h.logger.record(&[1.0, 2.0], &[0.5], false).unwrap();
    let rows = h.logger.rows();
    let path = h.logger.autosave_now().unwrap();

    let contents = fs::read_to_string(path).unwrap();
    let values = parse_line(contents.lines().next().unwrap()).unwrap();
    assert_eq!(values.len(), 7);
    assert_eq!(&values[..3], &[1.0, 2.0, 0.5]);
    assert_eq!(values[3], rows[0].timestamp_string().parse::<f64>().unwrap());
    assert_eq!(&values[4..], &[0.0, 0.0, 1.0]);
}
