use chrono::Utc;
use std::sync::Arc;

use crate::{
    ConfigSource, IngestError, WeatherProvider, WeatherRecord, WeatherSnapshot, WeatherStore,
};

/// Runs the fetch, normalize and store sequence against injected collaborators.
///
/// Each call is independent and produces a new record; nothing is retried.
#[derive(Debug, Clone)]
pub struct WeatherIngestor {
    config: Arc<dyn ConfigSource>,
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn WeatherStore>,
}

impl WeatherIngestor {
    pub fn new(
        config: Arc<dyn ConfigSource>,
        provider: Arc<dyn WeatherProvider>,
        store: Arc<dyn WeatherStore>,
    ) -> Self {
        Self { config, provider, store }
    }

    /// Fetch current conditions, persist them, and return the stored record.
    ///
    /// Nothing is written unless the upstream request and its parsing both succeed.
    pub async fn fetch_and_store_weather(&self) -> Result<WeatherRecord, IngestError> {
        let query = self.config.weather_query().await.map_err(IngestError::Config)?;

        let observation = self.provider.current_observation(&query).await?;
        let snapshot = WeatherSnapshot::from_observation(&observation, Utc::now());

        tracing::debug!(
            temp_c = snapshot.temp_c,
            condition = %snapshot.condition_text,
            "normalized observation"
        );

        Ok(self.store.create(snapshot).await?)
    }
}
