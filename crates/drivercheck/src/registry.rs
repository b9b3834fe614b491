//! Live connections, one per configured driver.

use tracing::info;

use crate::catalog::QueryCatalog;
use crate::config::BenchConfig;
use crate::drivers::{DriverHandle, DriverKind};
use crate::error::BenchError;

/// Driver name to connection, in run order.
#[derive(Debug, Default)]
pub struct DriverRegistry {
    entries: Vec<(String, DriverHandle)>,
}

impl DriverRegistry {
    /// Connect every configured driver.
    ///
    /// All names are checked against the catalog and the built-in adapters
    /// before the first connection is opened.
    pub fn connect(config: &BenchConfig, catalog: &QueryCatalog) -> Result<Self, BenchError> {
        catalog.resolve(config.drivers.as_slice())?;
        let kinds = config
            .drivers
            .iter()
            .map(|name| name.parse::<DriverKind>())
            .collect::<Result<Vec<_>, _>>()?;

        let mut registry = Self::default();
        for kind in kinds {
            let handle = DriverHandle::connect(kind, config)?;
            info!(
                driver = %kind,
                materialization = %handle.materialization(),
                "Connected"
            );
            registry.insert(kind.name(), handle);
        }
        Ok(registry)
    }

    /// Register a connection under a name, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, handle: DriverHandle) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = handle,
            None => self.entries.push((name, handle)),
        }
    }

    /// Connection registered under `driver`.
    pub fn connection_for(&mut self, driver: &str) -> Result<&mut DriverHandle, BenchError> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == driver)
            .map(|(_, handle)| handle)
            .ok_or_else(|| BenchError::UnknownDriver(driver.to_string()))
    }

    /// Registered driver names, in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut DriverHandle)> {
        self.entries
            .iter_mut()
            .map(|(name, handle)| (name.as_str(), handle))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
