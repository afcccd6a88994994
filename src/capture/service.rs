//! Per-thermometer capture operations.

use crate::capture::store::{Capture, CaptureStore};
use crate::error::{Result, ThermometerError};
use crate::sensor::{SensorReader, TemperatureReading, Thermometer};
use std::sync::Arc;

/// Binds a thermometer descriptor to its sensor and the shared capture store.
#[derive(Clone)]
pub struct ThermometerService {
    thermometer: Thermometer,
    reader: Arc<dyn SensorReader>,
    store: Arc<CaptureStore>,
}

impl ThermometerService {
    /// Bind `thermometer` to the reader that measures it and the store its captures go to.
    pub fn new(
        thermometer: Thermometer,
        reader: Arc<dyn SensorReader>,
        store: Arc<CaptureStore>,
    ) -> Self {
        Self {
            thermometer,
            reader,
            store,
        }
    }

    /// Thermometer id.
    pub fn id(&self) -> &str {
        &self.thermometer.id
    }

    /// Static description of the thermometer.
    pub fn thermometer(&self) -> &Thermometer {
        &self.thermometer
    }

    /// A handle to the sensor reader.
    pub fn reader(&self) -> Arc<dyn SensorReader> {
        Arc::clone(&self.reader)
    }

    /// Take a reading without storing it.
    pub async fn measure(&self) -> Result<TemperatureReading> {
        let reader = self.reader();
        tokio::task::spawn_blocking(move || reader.measure())
            .await
            .map_err(|e| ThermometerError::system_error(format!("Sensor task failed: {}", e)))?
    }

    /// Ids of this thermometer's captures, sorted.
    pub async fn list_captures(&self) -> Result<Vec<String>> {
        self.store.list(self.id()).await
    }

    /// Measure now and store the reading. Returns the new capture id.
    pub async fn capture(&self) -> Result<String> {
        self.store.create(self.id(), self.reader()).await
    }

    /// Load one capture.
    pub async fn retrieve(&self, capture: &str) -> Result<Capture> {
        self.store.retrieve(self.id(), capture).await
    }

    /// Remove one capture.
    pub async fn delete(&self, capture: &str) -> Result<()> {
        self.store.delete(self.id(), capture).await
    }
}

impl std::fmt::Debug for ThermometerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThermometerService")
            .field("thermometer", &self.thermometer)
            .field("store", &self.store.root())
            .finish()
    }
}
