use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

/// Everything the upstream provider needs for one request.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub api_key: String,
    pub coordinates: Coordinates,
}

/// Raw reading as reported by the provider, before any unit conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub observed_at: DateTime<Utc>,
    pub temperature_k: f64,
    pub humidity_pct: u8,
    pub cloud_pct: u8,
    pub condition_text: String,
    pub condition_code: i32,
    pub wind_speed_mps: f64,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// Normalized point-in-time weather, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub external_last_update: DateTime<Utc>,
    pub temp_c: i32,
    pub temp_f: i32,
    pub is_day: bool,
    pub cloud: u8,
    pub condition_text: String,
    pub condition_code: i32,
    pub humidity: u8,
    pub wind_k: i32,
    pub wind_m: i32,
}

/// A snapshot as written by a [`crate::WeatherStore`]. Records are never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: WeatherSnapshot,
}
