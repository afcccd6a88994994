//! Registry of all thermometers known to the process.

use crate::capture::service::ThermometerService;
use crate::capture::store::CaptureStore;
use crate::config::AppConfig;
use crate::error::{Result, ThermometerError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Built once at startup and handed to the web layer and the monitor.
#[derive(Debug, Clone, Default)]
pub struct ThermometerRegistry {
    services: BTreeMap<String, ThermometerService>,
}

impl ThermometerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every configured thermometer over one shared capture store.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let store = Arc::new(CaptureStore::new(&config.data_dir));

        let mut registry = Self::new();
        for thermometer in &config.thermometers {
            registry.register(ThermometerService::new(
                thermometer.descriptor(),
                thermometer.reader(),
                Arc::clone(&store),
            ))?;
        }
        Ok(registry)
    }

    /// Add a thermometer. Ids must be unique.
    pub fn register(&mut self, service: ThermometerService) -> Result<()> {
        if self.services.contains_key(service.id()) {
            return Err(ThermometerError::config_error(format!(
                "Thermometer {} registered twice",
                service.id()
            )));
        }
        self.services.insert(service.id().to_string(), service);
        Ok(())
    }

    /// Look up a thermometer by id.
    pub fn get(&self, id: &str) -> Result<&ThermometerService> {
        self.services
            .get(id)
            .ok_or_else(|| ThermometerError::invalid_thermometer(id))
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Registered services in id order.
    pub fn services(&self) -> impl Iterator<Item = &ThermometerService> {
        self.services.values()
    }

    /// Number of registered thermometers.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether no thermometer is registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
