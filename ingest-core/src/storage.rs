use async_trait::async_trait;
use std::fmt::Debug;

use crate::{StorageError, WeatherRecord, WeatherSnapshot};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryWeatherStore;
pub use sqlite::SqliteWeatherStore;

/// Write-once persistence for weather snapshots.
#[async_trait]
pub trait WeatherStore: Send + Sync + Debug {
    /// Persist a snapshot and return it with its generated id and timestamp.
    async fn create(&self, snapshot: WeatherSnapshot) -> Result<WeatherRecord, StorageError>;
}
