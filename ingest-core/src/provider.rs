use crate::{Config, ExternalServiceError, Observation, WeatherQuery};
use anyhow::Context;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch the current conditions at the query's coordinates.
    async fn current_observation(
        &self,
        query: &WeatherQuery,
    ) -> Result<Observation, ExternalServiceError>;
}

/// Construct the upstream provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::new(config.base_url(), config.timeout())
        .context("Failed to build HTTP client for the weather provider")?;

    Ok(Box::new(provider))
}
