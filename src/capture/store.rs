//! Flat-file capture storage.
//!
//! Each capture is one file `<root>/<thermometer>/<capture id>.txt` holding
//! the reading's text form. A file's existence is the only record that the
//! capture exists; there is no index to keep in sync.

use crate::error::{Result, ThermometerError};
use crate::sensor::SensorReader;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::fs;
use tokio::sync::Mutex;
use tokio_stream::wrappers::ReadDirStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

const CAPTURE_EXTENSION: &str = "txt";

/// A persisted reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// Owning thermometer
    pub thermometer: String,
    /// Opaque capture identifier
    pub id: String,
    /// Text form of the reading at capture time
    pub payload: String,
}

/// Stores captures for any number of thermometers under one root directory.
///
/// Operations on the same thermometer are serialised by a per-thermometer
/// lock, so a listing never races a create or delete issued through this
/// store. Other processes writing to the same directory are not covered and
/// see the storage as eventually consistent.
#[derive(Debug)]
pub struct CaptureStore {
    root: PathBuf,
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CaptureStore {
    /// Create a store rooted at `root`. Directories are created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Measure now and persist the reading. Returns the new capture id.
    ///
    /// Nothing is written when the measurement fails.
    pub async fn create(&self, thermometer: &str, reader: Arc<dyn SensorReader>) -> Result<String> {
        let reading = tokio::task::spawn_blocking(move || reader.measure())
            .await
            .map_err(|e| ThermometerError::system_error(format!("Sensor task failed: {}", e)))??;

        let id = uuid::Uuid::new_v4().simple().to_string();
        let lock = self.lock_for(thermometer);
        let _guard = lock.lock().await;

        let dir = self.thermometer_dir(thermometer);
        fs::create_dir_all(&dir).await?;

        let staging = dir.join(format!(".{}.tmp", id));
        write_then_rename(&staging, &self.capture_path(thermometer, &id), &reading.to_string())
            .await?;

        info!(thermometer, capture = %id, value = %reading, "Stored capture");
        Ok(id)
    }

    /// Ids of all captures stored for `thermometer`, sorted.
    pub async fn list(&self, thermometer: &str) -> Result<Vec<String>> {
        let lock = self.lock_for(thermometer);
        let _guard = lock.lock().await;

        let entries = match fs::read_dir(self.thermometer_dir(thermometer)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut stream = ReadDirStream::new(entries);
        let mut ids = Vec::new();
        while let Some(entry) = stream.next().await {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(CAPTURE_EXTENSION) {
                continue;
            }
            if let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) {
                if is_capture_id(id) {
                    ids.push(id.to_string());
                }
            }
        }
        ids.sort();

        debug!(thermometer, count = ids.len(), "Listed captures");
        Ok(ids)
    }

    /// Load one capture.
    pub async fn retrieve(&self, thermometer: &str, capture: &str) -> Result<Capture> {
        if !is_capture_id(capture) {
            return Err(ThermometerError::capture_not_found(thermometer, capture));
        }
        let lock = self.lock_for(thermometer);
        let _guard = lock.lock().await;

        match fs::read_to_string(self.capture_path(thermometer, capture)).await {
            Ok(payload) => Ok(Capture {
                thermometer: thermometer.to_string(),
                id: capture.to_string(),
                payload,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ThermometerError::capture_not_found(thermometer, capture))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove one capture. Deleting an id that is already gone fails.
    pub async fn delete(&self, thermometer: &str, capture: &str) -> Result<()> {
        if !is_capture_id(capture) {
            return Err(ThermometerError::capture_not_found(thermometer, capture));
        }
        let lock = self.lock_for(thermometer);
        let _guard = lock.lock().await;

        match fs::remove_file(self.capture_path(thermometer, capture)).await {
            Ok(()) => {
                info!(thermometer, capture, "Deleted capture");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ThermometerError::capture_not_found(thermometer, capture))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn lock_for(&self, thermometer: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(thermometer.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn thermometer_dir(&self, thermometer: &str) -> PathBuf {
        self.root.join(thermometer)
    }

    fn capture_path(&self, thermometer: &str, capture: &str) -> PathBuf {
        self.thermometer_dir(thermometer)
            .join(format!("{}.{}", capture, CAPTURE_EXTENSION))
    }
}

/// Write `contents` to `staging` and move it to `target`, so a listing never
/// sees a partial file. The staging file is removed if either step fails.
async fn write_then_rename(staging: &Path, target: &Path, contents: &str) -> std::io::Result<()> {
    let result = match fs::write(staging, contents).await {
        Ok(()) => fs::rename(staging, target).await,
        Err(e) => Err(e),
    };
    if result.is_err() {
        if let Err(e) = fs::remove_file(staging).await {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %staging.display(), error = %e, "Staging file left behind");
            }
        }
    }
    result
}

/// Capture ids are simple-format UUIDs: 32 lowercase hex digits.
fn is_capture_id(id: &str) -> bool {
    id.len() == 32 && id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}
