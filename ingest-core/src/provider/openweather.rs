use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::{ExternalFailure, ExternalServiceError},
    model::{Observation, WeatherQuery},
};

use super::WeatherProvider;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Current-conditions client for the OpenWeather 2.5 API. Responses use the
/// API's default units (Kelvin, metres per second).
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    async fn fetch_current(&self, query: &WeatherQuery) -> Result<Observation, ExternalFailure> {
        let url = format!("{}{CURRENT_WEATHER_PATH}", self.base_url);
        let coords = query.coordinates;

        tracing::debug!(lat = coords.lat, long = coords.long, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lon", coords.long.to_string()),
                ("appid", query.api_key.clone()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ExternalFailure::Status { status, body: truncate_body(&body) });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        parsed.into_observation()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i32,
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    clouds: OwClouds,
    wind: OwWind,
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_observation(self) -> Result<Observation, ExternalFailure> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or(ExternalFailure::MissingField("weather[0]"))?;

        Ok(Observation {
            observed_at: unix_to_utc(self.dt).ok_or(ExternalFailure::MissingField("dt"))?,
            temperature_k: self.main.temp,
            humidity_pct: self.main.humidity,
            cloud_pct: self.clouds.all,
            condition_text: condition.main,
            condition_code: condition.id,
            wind_speed_mps: self.wind.speed,
            sunrise: unix_to_utc(self.sys.sunrise)
                .ok_or(ExternalFailure::MissingField("sys.sunrise"))?,
            sunset: unix_to_utc(self.sys.sunset)
                .ok_or(ExternalFailure::MissingField("sys.sunset"))?,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_observation(
        &self,
        query: &WeatherQuery,
    ) -> Result<Observation, ExternalServiceError> {
        Ok(self.fetch_current(query).await?)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "coord": {"lon": -0.13, "lat": 51.51},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": 300.15, "feels_like": 299.0, "pressure": 1012, "humidity": 64},
        "wind": {"speed": 10.0, "deg": 250},
        "clouds": {"all": 75},
        "dt": 1700000000,
        "sys": {"country": "GB", "sunrise": 1699990000, "sunset": 1700020000},
        "name": "London"
    }"#;

    #[test]
    fn parses_raw_fields() {
        let parsed: OwCurrentResponse = serde_json::from_str(SAMPLE).expect("sample parses");
        let obs = parsed.into_observation().expect("complete response");

        assert_eq!(obs.temperature_k, 300.15);
        assert_eq!(obs.humidity_pct, 64);
        assert_eq!(obs.cloud_pct, 75);
        assert_eq!(obs.condition_text, "Clouds");
        assert_eq!(obs.condition_code, 803);
        assert_eq!(obs.wind_speed_mps, 10.0);
        assert_eq!(obs.observed_at.timestamp(), 1_700_000_000);
        assert_eq!(obs.sunrise.timestamp(), 1_699_990_000);
        assert_eq!(obs.sunset.timestamp(), 1_700_020_000);
    }

    #[test]
    fn empty_weather_list_is_missing_field() {
        let body = SAMPLE.replace(
            r#"[{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}]"#,
            "[]",
        );
        let parsed: OwCurrentResponse = serde_json::from_str(&body).expect("still valid json");
        let err = parsed.into_observation().unwrap_err();

        assert!(matches!(err, ExternalFailure::MissingField("weather[0]")));
    }

    #[test]
    fn missing_sys_block_fails_to_parse() {
        let body = SAMPLE.replace(
            r#""sys": {"country": "GB", "sunrise": 1699990000, "sunset": 1700020000},"#,
            "",
        );
        assert!(serde_json::from_str::<OwCurrentResponse>(&body).is_err());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider =
            OpenWeatherProvider::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.base_url, "http://localhost:8080");
    }
}
