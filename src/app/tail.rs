// LogView - app/tail.rs
//
// Live tail: follows a local log file for lines appended after tail was
// started and appends them to the store in real time.
//
// Architecture:
//   - `TailManager` lives on the UI thread; `run_tail_watcher` runs on a
//     background thread polling the file on a fixed interval.
//   - `Arc<AtomicBool>` flags carry cancel and pause requests.
//   - The manager owns the store's live tail status: `Playing` on start and
//     resume, `Paused` on pause, `Stopped` on stop.
//   - Parsed records go straight into the store; a summary is sent as
//     `TailProgress::Appended` over an mpsc channel.
//
// Error handling:
//   - Stat/read errors are non-fatal: logged, reported as FileError, retried
//     on the next tick.
//   - A truncated or rotated file (size < offset) resets the offset to 0.
//   - Sleep is sliced so cancel is noticed within
//     TAIL_CANCEL_CHECK_INTERVAL_MS.
//   - Reads are capped at MAX_TAIL_READ_BYTES_PER_TICK per tick. Bytes are
//     buffered raw and decoded only up to the last newline, so a character
//     split across reads arrives whole.
//   - Fallback ids come from a counter owned by the manager, so records from
//     an earlier session in the same store never share an id with new ones.

use crate::core::model::{LiveTailStatus, TailProgress};
use crate::core::parser;
use crate::core::store::LogStore;
use crate::util::constants::{
    DEFAULT_MAX_LOGS, MAX_TAIL_PARTIAL_BYTES, MAX_TAIL_READ_BYTES_PER_TICK,
    TAIL_CANCEL_CHECK_INTERVAL_MS, TAIL_POLL_INTERVAL_MS,
};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::time::Duration;

/// Tunables for one tail session.
#[derive(Debug, Clone, Copy)]
pub struct TailConfig {
    pub poll_interval_ms: u64,
    /// Oldest records are dropped beyond this many.
    pub max_logs: usize,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: TAIL_POLL_INTERVAL_MS,
            max_logs: DEFAULT_MAX_LOGS,
        }
    }
}

// =============================================================================
// TailManager
// =============================================================================

/// Manages a live tail on a background thread.
pub struct TailManager {
    progress_rx: Option<mpsc::Receiver<TailProgress>>,
    cancel_flag: Option<Arc<AtomicBool>>,
    pause_flag: Arc<AtomicBool>,
    store: Option<LogStore>,
    /// Next fallback id; survives stop and start.
    next_id: Arc<Mutex<u64>>,
}

impl TailManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
            pause_flag: Arc::new(AtomicBool::new(false)),
            store: None,
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Follow `path` from its current end. Stops any running tail first.
    pub fn start(&mut self, path: PathBuf, store: LogStore, config: TailConfig) {
        self.stop();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let pause = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));
        self.pause_flag = Arc::clone(&pause);
        self.store = Some(store.clone());

        store.set_live_tail(LiveTailStatus::Playing);
        tracing::info!(file = %path.display(), "Live tail started");

        let next_id = Arc::clone(&self.next_id);
        std::thread::spawn(move || {
            run_tail_watcher(path, store, config, tx, cancel, pause, next_id);
        });
    }

    /// Hold the current offset; lines written meanwhile arrive on resume.
    pub fn pause(&mut self) {
        if !self.is_active() {
            return;
        }
        self.pause_flag.store(true, Ordering::SeqCst);
        if let Some(store) = &self.store {
            store.set_live_tail(LiveTailStatus::Paused);
        }
    }

    pub fn resume(&mut self) {
        if !self.is_active() {
            return;
        }
        self.pause_flag.store(false, Ordering::SeqCst);
        if let Some(store) = &self.store {
            store.set_live_tail(LiveTailStatus::Playing);
        }
    }

    /// Request the background thread to stop and mark the tail stopped.
    pub fn stop(&mut self) {
        if let Some(flag) = self.cancel_flag.take() {
            flag.store(true, Ordering::SeqCst);
            tracing::info!("Live tail stop requested");
        }
        if let Some(store) = self.store.take() {
            store.set_live_tail(LiveTailStatus::Stopped);
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel_flag.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.is_active() && self.pause_flag.load(Ordering::SeqCst)
    }

    /// Drain pending progress messages without blocking.
    pub fn poll_progress(&self) -> Vec<TailProgress> {
        let mut messages = Vec::new();
        if let Some(ref rx) = self.progress_rx {
            while let Ok(msg) = rx.try_recv() {
                messages.push(msg);
            }
        }
        messages
    }
}

impl Default for TailManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TailManager {
    fn drop(&mut self) {
        if let Some(flag) = self.cancel_flag.take() {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

// =============================================================================
// Background tail watcher
// =============================================================================

fn run_tail_watcher(
    path: PathBuf,
    store: LogStore,
    config: TailConfig,
    tx: mpsc::Sender<TailProgress>,
    cancel: Arc<AtomicBool>,
    pause: Arc<AtomicBool>,
    next_id: Arc<Mutex<u64>>,
) {
    macro_rules! send {
        ($msg:expr) => {
            if tx.send($msg).is_err() {
                // UI channel closed.
                return;
            }
        };
    }

    // Seed at the current end so only content written after start shows up.
    let mut offset = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    let mut partial: Vec<u8> = Vec::new();
    let prefix = format!(
        "{}:tail",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("log")
    );

    tracing::debug!(file = %path.display(), offset, "Tail: seeding initial offset");
    send!(TailProgress::Started {
        path: path.clone(),
        offset,
    });

    let slices = (config.poll_interval_ms / TAIL_CANCEL_CHECK_INTERVAL_MS).max(1);

    loop {
        for _ in 0..slices {
            std::thread::sleep(Duration::from_millis(TAIL_CANCEL_CHECK_INTERVAL_MS));
            if cancel.load(Ordering::SeqCst) {
                send!(TailProgress::Stopped);
                return;
            }
        }
        if pause.load(Ordering::SeqCst) {
            continue;
        }

        let current_size = match std::fs::metadata(&path) {
            Ok(m) => m.len(),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Tail: stat error");
                send!(TailProgress::FileError {
                    path: path.clone(),
                    message: format!("Cannot stat: {e}"),
                });
                continue;
            }
        };

        if current_size < offset {
            tracing::info!(
                file = %path.display(),
                old_offset = offset,
                new_size = current_size,
                "Tail: file truncated or rotated, resetting offset to 0"
            );
            offset = 0;
            partial.clear();
        }
        if current_size == offset {
            continue;
        }

        let read_limit = ((current_size - offset) as usize).min(MAX_TAIL_READ_BYTES_PER_TICK);
        let new_bytes = match read_bytes_at(&path, offset, read_limit) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Tail: read error");
                send!(TailProgress::FileError {
                    path: path.clone(),
                    message: format!("Read error: {e}"),
                });
                continue;
            }
        };
        if new_bytes.is_empty() {
            continue;
        }
        offset += new_bytes.len() as u64;
        partial.extend_from_slice(&new_bytes);

        let Some(complete) = take_complete_lines(&mut partial) else {
            if partial.len() > MAX_TAIL_PARTIAL_BYTES {
                tracing::warn!(
                    file = %path.display(),
                    bytes = partial.len(),
                    "Tail: discarding oversized partial line"
                );
                partial.clear();
            }
            continue;
        };

        let result = {
            let mut next = next_id.lock().unwrap_or_else(PoisonError::into_inner);
            let result = parser::parse_content(&complete, &prefix, *next);
            *next += result.records.len() as u64;
            result
        };
        if result.records.is_empty() {
            continue;
        }
        let count = result.records.len();
        let dropped = store.append_logs(result.records, config.max_logs);

        tracing::debug!(file = %path.display(), count, dropped, "Tail: new records");
        send!(TailProgress::Appended { count, dropped });
    }
}

/// Split off and decode everything up to the last newline in `pending`,
/// leaving the unfinished tail behind. `None` until a newline arrives.
fn take_complete_lines(pending: &mut Vec<u8>) -> Option<String> {
    let nl = pending.iter().rposition(|b| *b == b'\n')?;
    let rest = pending.split_off(nl + 1);
    let complete = std::mem::replace(pending, rest);
    Some(String::from_utf8_lossy(&complete).into_owned())
}

/// Read up to `limit` bytes from `path` starting at `offset`.
fn read_bytes_at(path: &Path, offset: u64, limit: usize) -> std::io::Result<Vec<u8>> {
    let mut file = std::fs::File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0u8; limit];
    let n = file.read(&mut buf)?;
    buf.truncate(n);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::io::Write;
    use tempfile::TempDir;

    fn fast() -> TailConfig {
        TailConfig {
            poll_interval_ms: TAIL_CANCEL_CHECK_INTERVAL_MS,
            max_logs: 1_000,
        }
    }

    fn append(path: &Path, text: &str) {
        let mut f = OpenOptions::new().append(true).open(path).expect("open");
        f.write_all(text.as_bytes()).expect("append");
    }

    fn wait_for_logs(store: &LogStore, n: usize) -> bool {
        for _ in 0..100 {
            if store.snapshot().logs.len() >= n {
                return true;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        false
    }

    #[test]
    fn test_tail_appends_only_new_complete_lines() {
        let dir = TempDir::new().expect("tmpdir");
        let path = dir.path().join("live.log");
        std::fs::write(&path, "old line\n").expect("write");

        let store = LogStore::default();
        let mut tail = TailManager::new();
        tail.start(path.clone(), store.clone(), fast());
        assert_eq!(store.snapshot().live_tail, LiveTailStatus::Playing);

        // Give the watcher time to seed its offset.
        std::thread::sleep(Duration::from_millis(50));
        append(&path, "INFO fresh\npartial");
        assert!(wait_for_logs(&store, 1), "tail never delivered");

        let snap = store.snapshot();
        assert_eq!(snap.logs.len(), 1);
        assert_eq!(snap.logs[0].body, "fresh");
        assert_eq!(snap.logs[0].id, "live.log:tail-1");

        tail.stop();
        assert_eq!(store.snapshot().live_tail, LiveTailStatus::Stopped);
        assert!(!tail.is_active());
    }

    #[test]
    fn test_pause_and_resume_update_status() {
        let dir = TempDir::new().expect("tmpdir");
        let path = dir.path().join("live.log");
        std::fs::write(&path, "").expect("write");

        let store = LogStore::default();
        let mut tail = TailManager::new();
        tail.start(path, store.clone(), fast());

        tail.pause();
        assert!(tail.is_paused());
        assert_eq!(store.snapshot().live_tail, LiveTailStatus::Paused);

        tail.resume();
        assert!(!tail.is_paused());
        assert_eq!(store.snapshot().live_tail, LiveTailStatus::Playing);

        tail.stop();
        assert_eq!(store.snapshot().live_tail, LiveTailStatus::Stopped);
    }

    #[test]
    fn test_restarted_tail_keeps_ids_unique() {
        let dir = TempDir::new().expect("tmpdir");
        let path = dir.path().join("live.log");
        std::fs::write(&path, "").expect("write");

        let store = LogStore::default();
        let mut tail = TailManager::new();
        for round in 1..=2 {
            tail.start(path.clone(), store.clone(), fast());
            std::thread::sleep(Duration::from_millis(50));
            append(&path, &format!("INFO round {round}\n"));
            assert!(wait_for_logs(&store, round), "round {round} never delivered");
            tail.stop();
        }

        let ids: Vec<String> = store.snapshot().logs.iter().map(|l| l.id.clone()).collect();
        assert_eq!(ids, vec!["live.log:tail-1", "live.log:tail-2"]);
    }

    #[test]
    fn test_character_split_across_reads_arrives_whole() {
        let dir = TempDir::new().expect("tmpdir");
        let path = dir.path().join("live.log");
        std::fs::write(&path, "").expect("write");

        let store = LogStore::default();
        let mut tail = TailManager::new();
        tail.start(path.clone(), store.clone(), fast());
        std::thread::sleep(Duration::from_millis(50));

        let mut f = OpenOptions::new().append(true).open(&path).expect("open");
        f.write_all(b"INFO caf\xC3").expect("first half");
        f.flush().expect("flush");
        // Let at least one poll pick up the first half on its own.
        std::thread::sleep(Duration::from_millis(300));
        f.write_all(b"\xA9\n").expect("second half");
        f.flush().expect("flush");

        assert!(wait_for_logs(&store, 1), "tail never delivered");
        assert_eq!(store.snapshot().logs[0].body, "caf\u{e9}");
        tail.stop();
    }

    #[test]
    fn test_take_complete_lines_holds_back_unfinished_bytes() {
        let mut pending = b"one\ntw\xC3".to_vec();
        assert_eq!(take_complete_lines(&mut pending).as_deref(), Some("one\n"));
        assert_eq!(pending, b"tw\xC3");

        assert_eq!(take_complete_lines(&mut pending), None);
        pending.extend_from_slice(b"\xA9\n");
        assert_eq!(
            take_complete_lines(&mut pending).as_deref(),
            Some("tw\u{e9}\n")
        );
        assert!(pending.is_empty());
    }

    #[test]
    fn test_pause_without_tail_is_a_no_op() {
        let mut tail = TailManager::new();
        tail.pause();
        assert!(!tail.is_paused());
    }
}
