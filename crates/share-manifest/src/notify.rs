//! Change notification sentinel
//!
//! One temporary file per factory instance whose modification time advances
//! whenever a manifest is rebuilt. Consumer builds register it as a watch
//! dependency, so the host's watch layer re-runs them when a producer
//! rebuilds. The write is advisory: a failure only delays invalidation, so
//! it is logged and swallowed.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tempfile::NamedTempFile;
use tracing::warn;

#[derive(Debug)]
pub struct ChangeNotifier {
    // Held so the sentinel outlives every consumer that watches it.
    file: NamedTempFile,
}

impl ChangeNotifier {
    pub fn new() -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("share-manifest-")
            .suffix(".watch")
            .tempfile()?;
        Ok(ChangeNotifier { file })
    }

    /// Path of the sentinel file, for watch-dependency registration.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Advances the sentinel's modification time. Best-effort and
    /// fire-and-forget: manifest correctness never depends on it.
    pub fn touch(&self) {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or(0);

        if let Err(error) = fs::write(self.path(), millis.to_string()) {
            warn!(
                path = %self.path().display(),
                %error,
                "failed to update change-notifier sentinel"
            );
        }
    }
}
