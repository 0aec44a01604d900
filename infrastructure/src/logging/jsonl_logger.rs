//! JSONL file writer for resolution events.
//!
//! Each [`ResolutionEvent`] becomes one JSON line (see
//! [`ResolutionEvent::into_record`]) appended through a [`LineWriter`], so
//! every complete event reaches the file as soon as it is recorded.

use chrono::{SecondsFormat, Utc};
use qbank_application::ports::resolution_observer::{ResolutionEvent, ResolutionObserver};
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Resolution event sink that appends one JSON object per line.
pub struct JsonlResolutionLogger {
    writer: Mutex<LineWriter<File>>,
    path: PathBuf,
}

impl JsonlResolutionLogger {
    /// Open `path` for appending, creating parent directories as needed.
    ///
    /// Returns `None` (after a warning) when the file cannot be opened;
    /// event logging is optional and never stops a resolution.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(file) => Some(Self {
                writer: Mutex::new(LineWriter::new(file)),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!("Event log {} disabled: {}", path.display(), e);
                None
            }
        }
    }

    fn open(path: &Path) -> std::io::Result<File> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResolutionObserver for JsonlResolutionLogger {
    fn record(&self, event: ResolutionEvent) {
        let event_type = event.event_type;
        let record = event.into_record(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = serde_json::to_writer(&mut *writer, &record)
            .map_err(std::io::Error::from)
            .and_then(|()| writer.write_all(b"\n"))
        {
            warn!("Dropped {} event for {}: {}", event_type, self.path.display(), e);
        }
    }
}
