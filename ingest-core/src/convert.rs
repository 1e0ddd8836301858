//! Unit conversions applied to raw provider readings.
//!
//! Derived values are rounded to whole numbers. Fahrenheit is computed from
//! the rounded Celsius value and mph from the rounded km/h value, so the
//! stored pairs always agree with each other.

use chrono::{DateTime, Utc};

use crate::model::{Observation, WeatherSnapshot};

const KELVIN_OFFSET: f64 = 273.15;
const MPS_TO_KMH: f64 = 3.6;
const KMH_TO_MPH: f64 = 1.609;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

pub fn mps_to_kmh(speed: f64) -> f64 {
    speed * MPS_TO_KMH
}

pub fn kmh_to_mph(speed: f64) -> f64 {
    speed * KMH_TO_MPH
}

/// Daytime is the open interval between sunrise and sunset.
pub fn is_day(now: DateTime<Utc>, sunrise: DateTime<Utc>, sunset: DateTime<Utc>) -> bool {
    sunrise < now && now < sunset
}

fn whole(value: f64) -> i32 {
    value.round() as i32
}

impl WeatherSnapshot {
    /// Normalize a provider reading taken at `now`.
    pub fn from_observation(obs: &Observation, now: DateTime<Utc>) -> Self {
        let temp_c = whole(kelvin_to_celsius(obs.temperature_k));
        let wind_k = whole(mps_to_kmh(obs.wind_speed_mps));

        Self {
            external_last_update: obs.observed_at,
            temp_c,
            temp_f: whole(celsius_to_fahrenheit(f64::from(temp_c))),
            is_day: is_day(now, obs.sunrise, obs.sunset),
            cloud: obs.cloud_pct,
            condition_text: obs.condition_text.clone(),
            condition_code: obs.condition_code,
            humidity: obs.humidity_pct,
            wind_k,
            wind_m: whole(kmh_to_mph(f64::from(wind_k))),
        }
    }
}
