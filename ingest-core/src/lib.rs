//! Core library for the `weather-ingest` tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The upstream weather provider and unit conversions
//! - Write-once storage of normalized weather records
//!
//! It is used by `weather-ingest`, but the [`WeatherIngestor`] takes its
//! configuration, provider and store as trait objects so other services can
//! supply their own.

pub mod config;
pub mod convert;
pub mod error;
pub mod ingest;
pub mod model;
pub mod provider;
pub mod storage;

pub use config::{Config, ConfigSource};
pub use error::{ExternalFailure, ExternalServiceError, IngestError, StorageError};
pub use ingest::WeatherIngestor;
pub use model::{Coordinates, Observation, WeatherQuery, WeatherRecord, WeatherSnapshot};
pub use provider::{OpenWeatherProvider, WeatherProvider, provider_from_config};
pub use storage::{MemoryWeatherStore, SqliteWeatherStore, WeatherStore};
