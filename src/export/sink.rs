use std::{
    path::{Path, PathBuf},
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context as _;

use crate::foundation::error::{FlyerError, FlyerResult};

/// Receives finished export files ("the download").
pub trait DownloadSink: Send + Sync {
    /// Store `bytes` under `filename` and return where it ended up.
    fn save(&self, filename: &str, bytes: &[u8]) -> FlyerResult<PathBuf>;
}

/// Writes downloads into a directory, creating it if needed.
#[derive(Clone, Debug)]
pub struct DirDownloadSink {
    dir: PathBuf,
}

impl DirDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirDownloadSink {
    fn save(&self, filename: &str, bytes: &[u8]) -> FlyerResult<PathBuf> {
        if filename.contains(['/', '\\']) {
            return Err(FlyerError::validation(format!(
                "download filename '{filename}' must not contain path separators"
            )));
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create download dir '{}'", self.dir.display()))?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        Ok(path)
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryDownloads {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl InMemoryDownloads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything saved so far, in order.
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

impl DownloadSink for InMemoryDownloads {
    fn save(&self, filename: &str, bytes: &[u8]) -> FlyerResult<PathBuf> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| FlyerError::export("download buffer lock poisoned"))?;
        files.push((filename.to_owned(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }
}

/// User-visible notifications (the "alert").
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Prints notifications to stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Collects notifications for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        if let Ok(mut m) = self.messages.lock() {
            m.push(message.to_owned());
        }
    }
}

/// Wall clock used to stamp export filenames.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u128;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    }
}

/// Always reports the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub u128);

impl Clock for FixedClock {
    fn now_millis(&self) -> u128 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_sink_writes_and_rejects_separators() {
        let dir = PathBuf::from("target").join("dir_sink_writes");
        let _ = std::fs::remove_dir_all(&dir);
        let sink = DirDownloadSink::new(&dir);

        let path = sink.save("a.png", b"abc").unwrap();
        assert_eq!(path, dir.join("a.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");

        assert!(sink.save("../evil.png", b"x").is_err());
    }

    #[test]
    fn recorders_keep_order() {
        let n = RecordingNotifier::new();
        n.notify("one");
        n.notify("two");
        assert_eq!(n.messages(), vec!["one", "two"]);

        let d = InMemoryDownloads::new();
        d.save("x.png", &[1]).unwrap();
        assert_eq!(d.files(), vec![("x.png".to_owned(), vec![1])]);
    }

    #[test]
    fn clocks() {
        assert_eq!(FixedClock(42).now_millis(), 42);
        assert!(SystemClock.now_millis() > 1_600_000_000_000);
    }
}
