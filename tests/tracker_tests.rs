//! Progress tracker counters, snapshots and ETA.

use emlpush::engine::ProgressTracker;
use emlpush::{OutcomeStatus, ProgressSnapshot};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn snapshot(total: usize, processed: usize) -> ProgressSnapshot {
    ProgressSnapshot {
        total,
        processed,
        imported: processed,
        skipped: 0,
        failed: 0,
        elapsed: Duration::from_secs(1),
        eta: None,
    }
}

// --- counters ---

#[test]
fn test_new_tracker_is_empty() {
    let tracker = ProgressTracker::new(5);
    let snap = tracker.snapshot();
    assert_eq!(snap.total, 5);
    assert_eq!(snap.processed, 0);
    assert_eq!(snap.percent_complete(), 0.0);
    assert!(snap.eta.is_none());
    assert!(tracker.current_file().is_none());
}

#[test]
fn test_record_updates_processed() {
    let tracker = ProgressTracker::new(4);
    tracker.record_imported();
    tracker.record_skipped();
    tracker.record(OutcomeStatus::Failed);
    let snap = tracker.snapshot();
    assert_eq!(
        (snap.imported, snap.skipped, snap.failed, snap.processed),
        (1, 1, 1, 3)
    );
    assert_eq!(snap.percent_complete(), 75.0);
}

#[test]
fn test_eta_present_after_first_item() {
    let tracker = ProgressTracker::new(10);
    thread::sleep(Duration::from_millis(5));
    tracker.record_imported();
    let snap = tracker.snapshot();
    let eta = snap.eta.expect("eta once processed > 0");
    assert!(eta >= Duration::ZERO);
    assert!(snap.eta_seconds().unwrap() >= 0.0);
}

#[test]
fn test_eta_zero_when_done() {
    let tracker = ProgressTracker::new(2);
    tracker.record_imported();
    tracker.record_imported();
    assert_eq!(tracker.snapshot().eta, Some(Duration::ZERO));
}

#[test]
fn test_current_file_is_advisory() {
    let tracker = ProgressTracker::new(1);
    tracker.set_current_file(&PathBuf::from("/mail/a.eml"));
    assert_eq!(tracker.current_file(), Some(PathBuf::from("/mail/a.eml")));
    assert_eq!(tracker.snapshot().processed, 0);
}

// --- concurrency ---

#[test]
fn test_concurrent_records_stay_consistent() {
    let tracker = Arc::new(ProgressTracker::new(800));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || {
                for n in 0..100 {
                    match (i + n) % 3 {
                        0 => tracker.record_imported(),
                        1 => tracker.record_skipped(),
                        _ => tracker.record_failed(),
                    }
                    let snap = tracker.snapshot();
                    assert_eq!(snap.processed, snap.imported + snap.skipped + snap.failed);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let snap = tracker.snapshot();
    assert_eq!(snap.processed, 800);
    assert_eq!(snap.percent_complete(), 100.0);
}

#[test]
fn test_percent_non_decreasing() {
    let tracker = ProgressTracker::new(7);
    let mut last = 0.0;
    for _ in 0..7 {
        tracker.record_imported();
        let pct = tracker.snapshot().percent_complete();
        assert!(pct >= last);
        assert!((0.0..=100.0).contains(&pct));
        last = pct;
    }
}

// --- snapshot math ---

#[test]
fn test_percent_zero_total() {
    assert_eq!(snapshot(0, 0).percent_complete(), 0.0);
}

#[test]
fn test_percent_clamped() {
    assert_eq!(snapshot(2, 3).percent_complete(), 100.0);
    assert_eq!(snapshot(4, 1).percent_complete(), 25.0);
}
