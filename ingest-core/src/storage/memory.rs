use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use crate::{StorageError, WeatherRecord, WeatherSnapshot};

use super::WeatherStore;

/// Keeps records in process memory. Ids start at 1.
#[derive(Debug, Default)]
pub struct MemoryWeatherStore {
    records: Mutex<Vec<WeatherRecord>>,
}

impl MemoryWeatherStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Result<Vec<WeatherRecord>, StorageError> {
        let records = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(records.clone())
    }
}

#[async_trait]
impl WeatherStore for MemoryWeatherStore {
    async fn create(&self, snapshot: WeatherSnapshot) -> Result<WeatherRecord, StorageError> {
        let mut records = self.records.lock().map_err(|_| StorageError::Poisoned)?;

        let record = WeatherRecord {
            id: records.len() as i64 + 1,
            created_at: Utc::now(),
            snapshot,
        };
        records.push(record.clone());

        Ok(record)
    }
}
