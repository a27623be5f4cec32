//! Property tests for the recording log invariants

use chrono::{DateTime, Duration, Local, TimeZone};
use designlogger::config::FavoriteCapture;
use designlogger::session::RecordingLog;
use quickcheck_macros::quickcheck;

fn start() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// N calls at N distinct seconds give exactly N rows
#[quickcheck]
fn prop_one_row_per_distinct_second(calls: Vec<(Vec<u8>, bool)>) -> bool {
    let mut log = RecordingLog::new(FavoriteCapture::DesignVector);
    for (i, (design, favorite)) in calls.iter().enumerate() {
        let design: Vec<f64> = design.iter().map(|&v| f64::from(v)).collect();
        let now = start() + Duration::seconds(i as i64 + 1);
        log.record(&design, &[], 1, *favorite, now, start());
    }
    log.len() == calls.len() && log.rows().iter().all(|row| row.section == 1)
}

/// Calls within one second collapse to a single row
#[quickcheck]
fn prop_same_second_dedupes(offsets_ms: Vec<u16>) -> bool {
    let mut log = RecordingLog::default();
    for offset in &offsets_ms {
        let now = start() + Duration::seconds(1) + Duration::milliseconds(i64::from(offset % 1000));
        log.record(&[1.0], &[], 1, false, now, start());
    }
    log.len() == usize::from(!offsets_ms.is_empty())
}

/// Favorites only grow, in order, one per favorite call
#[quickcheck]
fn prop_favorites_monotonic(calls: Vec<(u8, bool)>) -> bool {
    let mut log = RecordingLog::default();
    let mut previous: Vec<Vec<f64>> = Vec::new();

    for (i, (value, favorite)) in calls.iter().enumerate() {
        let now = start() + Duration::milliseconds(700 * (i as i64 + 1));
        log.record(&[f64::from(*value)], &[], 1, *favorite, now, start());

        let current = log.favorites();
        if current.len() < previous.len() || current[..previous.len()] != previous[..] {
            return false;
        }
        previous = current.to_vec();
    }

    let expected = calls.iter().filter(|(_, favorite)| *favorite).count();
    log.favorites().len() == expected
}
