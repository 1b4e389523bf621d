// LogView - tests/e2e_logs_view.rs
//
// End-to-end tests for the file -> store -> logs view pipeline.
//
// These tests exercise the real filesystem, the real background ingest and
// live tail threads, and the real frame selection. Files are written to
// temporary directories; nothing is mocked.

use logview::app::ingest::IngestManager;
use logview::app::state::AppState;
use logview::app::tail::{TailConfig, TailManager};
use logview::core::dispatch::{Body, Row};
use logview::core::model::{
    IngestProgress, LinesPerRow, LiveTailStatus, TailProgress, ViewMode,
};
use logview::core::presentation::{select_frame, Frame, LogsTableProps, Notice};
use logview::core::store::LogStore;
use logview::platform::config::load_config;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

// =============================================================================
// Helpers
// =============================================================================

const SAMPLE: &str = r#"{"id":"a1","timestamp":"2024-03-01T10:00:00Z","level":"info","message":"service started","host":"web-1"}
{"id":"a2","timestamp":"2024-03-01T10:00:01Z","level":"error","message":"upstream timeout","host":"web-2","route":"/api"}
2024-03-01T10:00:02Z WARN disk usage at 91%
"#;

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Poll the ingest manager until it reports a terminal message.
fn wait_for_ingest(manager: &mut IngestManager) -> IngestProgress {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        for msg in manager.poll_progress() {
            if !matches!(msg, IngestProgress::Started { .. }) {
                return msg;
            }
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("ingest did not finish");
}

fn wait_until(mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if done() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("condition not reached in time");
}

fn props(view_mode: ViewMode) -> LogsTableProps {
    LogsTableProps {
        view_mode,
        lines_per_row: LinesPerRow::new(3).unwrap(),
    }
}

// =============================================================================
// Ingest E2E
// =============================================================================

/// A mixed JSON / plain-text file lands in the store and every view sees it.
#[test]
fn e2e_ingest_feeds_all_view_modes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "service.log", SAMPLE);

    let store = LogStore::default();
    let sub = store.subscribe();
    let mut ingest = IngestManager::new();
    ingest.start(path, store.clone());

    let done = wait_for_ingest(&mut ingest);
    assert!(
        matches!(done, IngestProgress::Completed { records: 3, .. }),
        "unexpected ingest result: {done:?}"
    );
    assert!(sub.changed());
    assert!(!ingest.is_active());

    let state = store.snapshot();
    assert!(!state.is_loading);
    let ids: Vec<_> = state.logs.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2", "service.log-3"]);

    // Attribute keys become interesting fields.
    assert!(state.fields.interesting.iter().any(|f| f == "host"));
    assert!(state.fields.interesting.iter().any(|f| f == "route"));

    // Raw: heading, no notice, virtualized rows keyed by record id.
    match select_frame(&props(ViewMode::Raw), &state) {
        Frame::Content {
            show_heading: true,
            notice: None,
            body: Body::Virtualized(list),
        } => {
            assert_eq!(list.total_count(), 3);
            match list.item_content(1) {
                Some(Row::Raw { log, lines_per_row }) => {
                    assert_eq!(log.id, "a2");
                    assert_eq!(lines_per_row.get(), 3);
                }
                other => panic!("expected raw row, got {other:?}"),
            }
            assert!(list.item_content(3).is_none());
        }
        other => panic!("unexpected raw frame: {other:?}"),
    }

    // Table: no heading, the whole collection in one piece.
    store.toggle_selected_field("host");
    let state = store.snapshot();
    match select_frame(&props(ViewMode::Table), &state) {
        Frame::Content {
            show_heading: false,
            notice: None,
            body: Body::Table(spec),
        } => {
            assert_eq!(spec.logs.len(), 3);
            assert_eq!(spec.fields, ["host".to_string()]);
            assert_eq!(spec.logs[0].field("host").as_deref(), Some("web-1"));
            assert_eq!(spec.logs[2].field("host"), None);
        }
        other => panic!("unexpected table frame: {other:?}"),
    }
}

/// A failed load leaves the previous logs in place.
#[test]
fn e2e_failed_ingest_keeps_previous_logs() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_file(dir.path(), "good.log", SAMPLE);

    let store = LogStore::default();
    let mut ingest = IngestManager::new();
    ingest.start(good, store.clone());
    wait_for_ingest(&mut ingest);
    assert_eq!(store.snapshot().logs.len(), 3);

    ingest.start(dir.path().join("missing.log"), store.clone());
    let done = wait_for_ingest(&mut ingest);
    assert!(matches!(done, IngestProgress::Failed { .. }), "{done:?}");

    let state = store.snapshot();
    assert_eq!(state.logs.len(), 3);
    assert!(!state.is_loading);
}

/// An empty file produces the "no logs" notice rather than an error.
#[test]
fn e2e_empty_file_shows_no_logs_notice() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "empty.log", "\n\n");

    let store = LogStore::default();
    let mut ingest = IngestManager::new();
    ingest.start(path, store.clone());
    wait_for_ingest(&mut ingest);

    let state = store.snapshot();
    match select_frame(&props(ViewMode::List), &state) {
        Frame::Content { notice, body, .. } => {
            assert_eq!(notice, Some(Notice::NoLogsFound));
            assert!(matches!(body, Body::Virtualized(list) if list.total_count() == 0));
        }
        other => panic!("unexpected frame: {other:?}"),
    }
}

// =============================================================================
// Live tail E2E
// =============================================================================

/// Lines appended after the tail starts reach the store; earlier lines do not.
#[test]
fn e2e_live_tail_follows_appended_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "live.log", "2024-03-01T09:59:59Z INFO before start\n");

    let store = LogStore::default();
    let mut tail = TailManager::new();
    tail.start(
        path.clone(),
        store.clone(),
        TailConfig {
            poll_interval_ms: 100,
            max_logs: 1_000,
        },
    );

    // Playing with nothing yet: the waiting notice.
    wait_until(|| {
        tail.poll_progress()
            .iter()
            .any(|m| matches!(m, TailProgress::Started { .. }))
    });
    let state = store.snapshot();
    assert_eq!(state.live_tail, LiveTailStatus::Playing);
    match select_frame(&props(ViewMode::Raw), &state) {
        Frame::Content { notice, .. } => assert_eq!(notice, Some(Notice::WaitingForLiveLogs)),
        other => panic!("unexpected frame: {other:?}"),
    }

    {
        let mut f = fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(f, "2024-03-01T10:00:00Z ERROR first live line").unwrap();
        writeln!(f, r#"{{"level":"debug","msg":"second live line"}}"#).unwrap();
    }
    wait_until(|| store.snapshot().logs.len() == 2);

    let state = store.snapshot();
    assert_eq!(state.logs[0].body, "first live line");
    assert_eq!(state.logs[1].body, "second live line");
    assert_eq!(state.logs[0].id, "live.log:tail-1");
    assert!(state.logs.iter().all(|l| l.body != "before start"));

    tail.pause();
    assert_eq!(store.snapshot().live_tail, LiveTailStatus::Paused);
    tail.resume();
    assert_eq!(store.snapshot().live_tail, LiveTailStatus::Playing);

    tail.stop();
    assert!(!tail.is_active());
    assert_eq!(store.snapshot().live_tail, LiveTailStatus::Stopped);
}

// =============================================================================
// Configuration E2E
// =============================================================================

/// config.toml drives the initial props and selected fields.
#[test]
fn e2e_config_sets_initial_view() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "config.toml",
        r#"
[view]
default_mode = "table"
lines_per_row = 4
selected_fields = ["host", "route"]

[font]
timeout_ms = 2500
"#,
    );

    let (config, warnings) = load_config(dir.path());
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    assert_eq!(config.font_timeout_ms, 2500);

    let store = LogStore::default();
    let state = AppState::new(config, store.clone(), false);
    assert_eq!(state.props.view_mode, ViewMode::Table);
    assert_eq!(state.props.lines_per_row.get(), 4);
    assert_eq!(
        store.snapshot().fields.selected,
        vec!["host".to_string(), "route".to_string()]
    );
}

/// Out-of-range values warn and fall back instead of failing startup.
#[test]
fn e2e_config_out_of_range_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "config.toml",
        "[view]\nlines_per_row = 0\n[font]\ntimeout_ms = 5\n",
    );

    let (config, warnings) = load_config(dir.path());
    assert_eq!(warnings.len(), 2, "{warnings:?}");
    assert_eq!(config.lines_per_row, LinesPerRow::default());
    assert_eq!(config.font_timeout_ms, 5000);
}
