// LogView - core/store.rs
//
// Process-wide logs state with explicit snapshot + subscription access.
//
// Architecture:
//   - `LogStore` is a cheap cloneable handle; background workers (ingest,
//     tail) and the UI share one store.
//   - Readers take an `Arc<LogsState>` snapshot; writers go through `update`,
//     which copies-on-write when a snapshot is still held elsewhere. The
//     records have their own `Arc`, so only reducers that change them pay
//     for copying them.
//   - Every update bumps a generation counter and sends it to each live
//     subscriber over an mpsc channel. Dropping a `Subscription` removes it.

use crate::core::model::{LiveTailStatus, LogRecord, LogsState, BUILTIN_FIELDS};
use std::collections::BTreeSet;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError, Weak};

struct StoreInner {
    state: Arc<LogsState>,
    generation: u64,
    next_subscriber_id: u64,
    subscribers: Vec<(u64, mpsc::Sender<u64>)>,
}

/// Shared handle to the logs state.
#[derive(Clone)]
pub struct LogStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl std::fmt::Debug for LogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("LogStore")
            .field("generation", &inner.generation)
            .field("logs", &inner.state.logs.len())
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

/// A poisoned lock only means a writer panicked mid-update; the state itself
/// is still a valid `LogsState`, so keep serving it.
fn lock(inner: &Mutex<StoreInner>) -> MutexGuard<'_, StoreInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LogStore {
    pub fn new(state: LogsState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                state: Arc::new(state),
                generation: 0,
                next_subscriber_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Current state. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<LogsState> {
        Arc::clone(&lock(&self.inner).state)
    }

    /// Number of updates applied so far.
    pub fn generation(&self) -> u64 {
        lock(&self.inner).generation
    }

    /// Register for change notifications.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut inner = lock(&self.inner);
        let id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;
        inner.subscribers.push((id, tx));
        tracing::debug!(subscriber = id, "Store subscription added");
        Subscription {
            id,
            rx,
            store: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).subscribers.len()
    }

    /// Apply `f` to the state and notify subscribers.
    pub fn update<R>(&self, f: impl FnOnce(&mut LogsState) -> R) -> R {
        let mut inner = lock(&self.inner);
        let result = f(Arc::make_mut(&mut inner.state));
        notify(&mut inner);
        result
    }

    // -------------------------------------------------------------------------
    // Reducers
    // -------------------------------------------------------------------------

    pub fn set_loading(&self, is_loading: bool) {
        self.update(|s| s.is_loading = is_loading);
    }

    pub fn set_live_tail(&self, status: LiveTailStatus) {
        self.update(|s| s.live_tail = status);
        tracing::debug!(status = %status, "Live tail status changed");
    }

    /// Replace the whole collection (e.g. after loading a file).
    pub fn replace_logs(&self, logs: Vec<LogRecord>) {
        self.update(|s| install_logs(s, logs));
    }

    /// Finish a background load in one step: install `logs` when given and
    /// lower `is_loading`, but only while `is_current` still holds. The check
    /// runs under the store lock, so a superseded load can never land after
    /// the load that replaced it. Returns whether anything was applied.
    pub fn finish_load(
        &self,
        logs: Option<Vec<LogRecord>>,
        is_current: impl FnOnce() -> bool,
    ) -> bool {
        let mut inner = lock(&self.inner);
        if !is_current() {
            return false;
        }
        let state = Arc::make_mut(&mut inner.state);
        if let Some(logs) = logs {
            install_logs(state, logs);
        }
        state.is_loading = false;
        notify(&mut inner);
        true
    }

    /// Append records, dropping the oldest so at most `max_logs` remain.
    /// Returns how many records were dropped.
    pub fn append_logs(&self, logs: Vec<LogRecord>, max_logs: usize) -> usize {
        if logs.is_empty() {
            return 0;
        }
        self.update(|s| {
            for log in &logs {
                s.fields.seen.extend(log.attributes.keys().cloned());
            }
            let records = Arc::make_mut(&mut s.logs);
            records.extend(logs);
            let overflow = records.len().saturating_sub(max_logs);
            if overflow > 0 {
                records.drain(..overflow);
            }
            refresh_interesting(s);
            overflow
        })
    }

    /// Add `name` to the selected fields, or remove it if already selected.
    pub fn toggle_selected_field(&self, name: &str) {
        self.update(|s| {
            if let Some(pos) = s.fields.selected.iter().position(|f| f == name) {
                s.fields.selected.remove(pos);
            } else {
                s.fields.selected.push(name.to_string());
            }
            refresh_interesting(s);
        });
    }

    pub fn set_selected_fields(&self, selected: Vec<String>) {
        self.update(|s| {
            s.fields.selected = selected;
            refresh_interesting(s);
        });
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new(LogsState::default())
    }
}

/// Bump the generation and wake every live subscriber.
fn notify(inner: &mut StoreInner) {
    inner.generation += 1;
    let generation = inner.generation;
    inner
        .subscribers
        .retain(|(_, tx)| tx.send(generation).is_ok());
}

fn install_logs(state: &mut LogsState, logs: Vec<LogRecord>) {
    state.fields.seen.clear();
    for log in &logs {
        state.fields.seen.extend(log.attributes.keys().cloned());
    }
    state.logs = Arc::new(logs);
    refresh_interesting(state);
}

/// Recompute `interesting`: the built-ins plus every attribute name seen,
/// minus the ones already selected. Names of records later trimmed from the
/// front stay listed. Touches field names only, never the records.
fn refresh_interesting(state: &mut LogsState) {
    let fields = &mut state.fields;
    let names: BTreeSet<&str> = BUILTIN_FIELDS
        .iter()
        .copied()
        .chain(fields.seen.iter().map(String::as_str))
        .collect();
    let interesting: Vec<String> = names
        .into_iter()
        .filter(|name| !fields.selected.iter().any(|s| s.as_str() == *name))
        .map(str::to_string)
        .collect();
    fields.interesting = interesting;
}

/// Change-notification handle. Unsubscribes on drop.
pub struct Subscription {
    id: u64,
    rx: mpsc::Receiver<u64>,
    store: Weak<Mutex<StoreInner>>,
}

impl Subscription {
    /// Drain pending notifications; `true` if any update happened since the
    /// last call. Never blocks.
    pub fn changed(&self) -> bool {
        let mut changed = false;
        while self.rx.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            lock(&inner).subscribers.retain(|(id, _)| *id != self.id);
            tracing::debug!(subscriber = self.id, "Store subscription released");
        }
    }
}
