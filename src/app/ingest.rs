// LogView - app/ingest.rs
//
// Loads a local log file into the store on a background thread.
//
// Architecture:
//   - `IngestManager` lives on the UI thread; `run_ingest` runs on a
//     background thread and writes straight into the shared `LogStore`.
//   - Every `start` and `cancel` bumps a shared load generation. A worker
//     only finishes into the store while its generation is still current,
//     and that check happens under the store lock, so a superseded load can
//     neither replace newer logs nor lower `is_loading` for them.
//   - `is_loading` is raised by `start`, lowered by `cancel`, and otherwise
//     lowered by the current worker on success and failure alike.
//   - Progress is reported over an mpsc channel polled once per frame.

use crate::core::model::IngestProgress;
use crate::core::parser;
use crate::core::store::LogStore;
use crate::util::constants::MAX_INGEST_FILE_BYTES;
use crate::util::error::IngestError;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Instant;

/// Identifies one load; stale once a newer load starts or it is cancelled.
#[derive(Debug, Clone)]
struct LoadTicket {
    current: Arc<AtomicU64>,
    id: u64,
}

impl LoadTicket {
    fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.id
    }
}

/// Manages a file load on a background thread.
pub struct IngestManager {
    progress_rx: Option<mpsc::Receiver<IngestProgress>>,
    generation: Arc<AtomicU64>,
    store: Option<LogStore>,
}

impl IngestManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            generation: Arc::new(AtomicU64::new(0)),
            store: None,
        }
    }

    /// Start loading `path` into `store`, superseding any load in flight.
    pub fn start(&mut self, path: PathBuf, store: LogStore) {
        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let ticket = LoadTicket {
            current: Arc::clone(&self.generation),
            id,
        };

        let (tx, rx) = mpsc::channel();
        self.progress_rx = Some(rx);
        self.store = Some(store.clone());
        store.set_loading(true);

        tracing::info!(file = %path.display(), load = id, "Ingest requested");
        std::thread::spawn(move || run_ingest(path, store, tx, ticket));
    }

    /// Abandon the background load. Its result never reaches the logs.
    pub fn cancel(&mut self) {
        if let Some(store) = self.store.take() {
            self.generation.fetch_add(1, Ordering::SeqCst);
            store.set_loading(false);
            tracing::info!("Ingest cancel requested");
        }
    }

    pub fn is_active(&self) -> bool {
        self.store.is_some()
    }

    /// Drain pending progress messages without blocking.
    pub fn poll_progress(&mut self) -> Vec<IngestProgress> {
        let mut messages = Vec::new();
        if let Some(ref rx) = self.progress_rx {
            while let Ok(msg) = rx.try_recv() {
                messages.push(msg);
            }
        }
        let finished = messages.iter().any(|m| {
            matches!(
                m,
                IngestProgress::Completed { .. }
                    | IngestProgress::Failed { .. }
                    | IngestProgress::Cancelled
            )
        });
        if finished {
            self.store = None;
        }
        messages
    }
}

impl Default for IngestManager {
    fn default() -> Self {
        Self::new()
    }
}

fn run_ingest(
    path: PathBuf,
    store: LogStore,
    tx: mpsc::Sender<IngestProgress>,
    ticket: LoadTicket,
) {
    let started = Instant::now();
    let _ = tx.send(IngestProgress::Started { path: path.clone() });

    let cancelled = |path: &Path| {
        tracing::info!(file = %path.display(), load = ticket.id, "Ingest superseded");
        let _ = tx.send(IngestProgress::Cancelled);
    };

    let content = match load_file(&path) {
        Ok(content) => content,
        Err(e) => {
            if store.finish_load(None, || ticket.is_current()) {
                tracing::warn!(error = %e, "Ingest failed");
                let _ = tx.send(IngestProgress::Failed {
                    error: e.to_string(),
                });
            } else {
                cancelled(&path);
            }
            return;
        }
    };
    if !ticket.is_current() {
        cancelled(&path);
        return;
    }

    let prefix = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("log")
        .to_string();
    let result = parser::parse_content(&content, &prefix, 1);
    let records = result.records.len();
    if !store.finish_load(Some(result.records), || ticket.is_current()) {
        cancelled(&path);
        return;
    }

    let duration = started.elapsed();
    tracing::info!(
        file = %path.display(),
        records,
        lines = result.lines_processed,
        ms = duration.as_millis() as u64,
        "Ingest complete"
    );
    let _ = tx.send(IngestProgress::Completed {
        path,
        records,
        duration,
    });
}

/// Read a whole log file as lossy UTF-8 after checking its size.
pub fn load_file(path: &Path) -> Result<String, IngestError> {
    let meta = std::fs::metadata(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_file() {
        return Err(IngestError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    if meta.len() > MAX_INGEST_FILE_BYTES {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: meta.len(),
            max: MAX_INGEST_FILE_BYTES,
        });
    }
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
