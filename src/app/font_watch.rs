// LogView - app/font_watch.rs
//
// Font readiness for the raw view. When enabled, looks up the requested
// monospace face on a background thread and hands its bytes to the UI.
// The wait is bounded: past the deadline the observer gives up and the
// built-in monospace font stays in use. Outcomes only affect how raw text
// looks, never what is rendered.
//
// Lifecycle:
//   Idle --enable--> Pending --bytes--> Ready
//                       |--deadline--> TimedOut
//                       |--error-----> Failed
//                       |--disable---> Idle (lookup cancelled)
// Ready, TimedOut and Failed are terminal.

use crate::platform::fs;
use crate::util::constants::MAX_FONT_FILE_BYTES;
use crate::util::error::FontError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

/// Face the raw view wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRequest {
    pub family: String,
    pub weight: u16,
}

/// Font bytes ready to be installed.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    /// Name to register the font under, e.g. "Fira Code 300".
    pub name: String,
    pub path: PathBuf,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStatus {
    Idle,
    Pending,
    Ready,
    TimedOut,
    Failed,
}

/// Where font lookups come from. The default implementation walks the system
/// font directories; tests substitute their own.
pub trait FontSource: Send + Sync + 'static {
    fn load(&self, request: &FontRequest, cancel: &AtomicBool) -> Result<LoadedFont, FontError>;
}

/// Looks fonts up on disk under a fixed set of directories.
#[derive(Debug, Clone)]
pub struct DirectoryFontSource {
    pub dirs: Vec<PathBuf>,
}

impl DirectoryFontSource {
    pub fn system() -> Self {
        Self {
            dirs: fs::system_font_dirs(),
        }
    }
}

impl FontSource for DirectoryFontSource {
    fn load(&self, request: &FontRequest, cancel: &AtomicBool) -> Result<LoadedFont, FontError> {
        let path = fs::find_font_file(&self.dirs, &request.family, request.weight, cancel)?;
        let size = std::fs::metadata(&path)
            .map_err(|source| FontError::Io {
                path: path.clone(),
                source,
            })?
            .len();
        if size > MAX_FONT_FILE_BYTES {
            return Err(FontError::FileTooLarge {
                path,
                size,
                max: MAX_FONT_FILE_BYTES,
            });
        }
        let data = std::fs::read(&path).map_err(|source| FontError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(LoadedFont {
            name: format!("{} {}", request.family, request.weight),
            path,
            data,
        })
    }
}

struct Lookup {
    rx: mpsc::Receiver<Result<LoadedFont, FontError>>,
    cancel: Arc<AtomicBool>,
    deadline: Instant,
}

/// Bounded, cancellable wait for a font.
pub struct FontObserver {
    request: FontRequest,
    timeout: Duration,
    source: Arc<dyn FontSource>,
    status: FontStatus,
    lookup: Option<Lookup>,
}

impl FontObserver {
    pub fn new(request: FontRequest, timeout: Duration, source: Arc<dyn FontSource>) -> Self {
        Self {
            request,
            timeout,
            source,
            status: FontStatus::Idle,
            lookup: None,
        }
    }

    pub fn status(&self) -> FontStatus {
        self.status
    }

    pub fn request(&self) -> &FontRequest {
        &self.request
    }

    /// Drive the observer once per frame.
    ///
    /// Returns the font exactly once, on the frame it becomes available.
    pub fn observe(&mut self, enabled: bool) -> Option<LoadedFont> {
        match (self.status, enabled) {
            (FontStatus::Idle, true) => {
                self.begin();
                None
            }
            (FontStatus::Pending, false) => {
                self.cancel();
                None
            }
            (FontStatus::Pending, true) => self.poll(),
            _ => None,
        }
    }

    fn begin(&mut self) {
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let thread_cancel = Arc::clone(&cancel);
        let source = Arc::clone(&self.source);
        let request = self.request.clone();

        std::thread::spawn(move || {
            let result = source.load(&request, &thread_cancel);
            // Receiver gone means the observer was cancelled or dropped.
            let _ = tx.send(result);
        });

        tracing::debug!(
            family = %self.request.family,
            weight = self.request.weight,
            timeout_ms = self.timeout.as_millis() as u64,
            "Waiting for raw view font"
        );
        self.lookup = Some(Lookup {
            rx,
            cancel,
            deadline: Instant::now() + self.timeout,
        });
        self.status = FontStatus::Pending;
    }

    fn poll(&mut self) -> Option<LoadedFont> {
        let lookup = self.lookup.as_ref()?;
        match lookup.rx.try_recv() {
            Ok(Ok(font)) => {
                tracing::info!(
                    font = %font.name,
                    path = %font.path.display(),
                    bytes = font.data.len(),
                    "Raw view font ready"
                );
                self.lookup = None;
                self.status = FontStatus::Ready;
                Some(font)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Raw view font unavailable; using default monospace");
                self.lookup = None;
                self.status = FontStatus::Failed;
                None
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::warn!("Font lookup thread exited without a result");
                self.lookup = None;
                self.status = FontStatus::Failed;
                None
            }
            Err(mpsc::TryRecvError::Empty) => {
                if Instant::now() >= lookup.deadline {
                    lookup.cancel.store(true, Ordering::SeqCst);
                    tracing::warn!(
                        family = %self.request.family,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Timed out waiting for raw view font; using default monospace"
                    );
                    self.lookup = None;
                    self.status = FontStatus::TimedOut;
                }
                None
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(lookup) = self.lookup.take() {
            lookup.cancel.store(true, Ordering::SeqCst);
            tracing::debug!("Font lookup cancelled");
        }
        self.status = FontStatus::Idle;
    }

    /// Time left before the pending lookup gives up.
    pub fn remaining(&self) -> Option<Duration> {
        self.lookup
            .as_ref()
            .map(|l| l.deadline.saturating_duration_since(Instant::now()))
    }
}

impl Drop for FontObserver {
    fn drop(&mut self) {
        if let Some(lookup) = self.lookup.take() {
            lookup.cancel.store(true, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct InMemory;

    impl FontSource for InMemory {
        fn load(&self, request: &FontRequest, _: &AtomicBool) -> Result<LoadedFont, FontError> {
            Ok(LoadedFont {
                name: request.family.clone(),
                path: PathBuf::from("mem.ttf"),
                data: vec![1, 2, 3],
            })
        }
    }

    /// Blocks until cancelled, counting how many lookups started.
    struct Hang(Arc<AtomicUsize>);

    impl FontSource for Hang {
        fn load(&self, request: &FontRequest, cancel: &AtomicBool) -> Result<LoadedFont, FontError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            while !cancel.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(5));
            }
            Err(FontError::NotFound {
                family: request.family.clone(),
                weight: request.weight,
            })
        }
    }

    fn request() -> FontRequest {
        FontRequest {
            family: "Fira Code".to_string(),
            weight: 300,
        }
    }

    fn drive(observer: &mut FontObserver, enabled: bool) -> Option<LoadedFont> {
        for _ in 0..200 {
            if let Some(font) = observer.observe(enabled) {
                return Some(font);
            }
            if observer.status() != FontStatus::Pending {
                return None;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_disabled_observer_does_nothing() {
        let started = Arc::new(AtomicUsize::new(0));
        let mut observer = FontObserver::new(
            request(),
            Duration::from_secs(5),
            Arc::new(Hang(Arc::clone(&started))),
        );
        assert!(observer.observe(false).is_none());
        assert_eq!(observer.status(), FontStatus::Idle);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(started.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_font_delivered_once() {
        let mut observer =
            FontObserver::new(request(), Duration::from_secs(5), Arc::new(InMemory));
        observer.observe(true);
        let font = drive(&mut observer, true).expect("font delivered");
        assert_eq!(font.data, vec![1, 2, 3]);
        assert_eq!(observer.status(), FontStatus::Ready);
        assert!(observer.observe(true).is_none());
    }

    #[test]
    fn test_times_out_and_stays_timed_out() {
        let started = Arc::new(AtomicUsize::new(0));
        let mut observer = FontObserver::new(
            request(),
            Duration::from_millis(30),
            Arc::new(Hang(Arc::clone(&started))),
        );
        observer.observe(true);
        assert!(drive(&mut observer, true).is_none());
        assert_eq!(observer.status(), FontStatus::TimedOut);

        // Terminal: no new lookup is started.
        observer.observe(true);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disabling_cancels_pending_lookup() {
        let started = Arc::new(AtomicUsize::new(0));
        let mut observer = FontObserver::new(
            request(),
            Duration::from_secs(5),
            Arc::new(Hang(Arc::clone(&started))),
        );
        observer.observe(true);
        assert_eq!(observer.status(), FontStatus::Pending);
        assert!(observer.remaining().is_some());

        observer.observe(false);
        assert_eq!(observer.status(), FontStatus::Idle);
        assert!(observer.remaining().is_none());
    }
}
