//! Open-Meteo forecast client producing [`WeatherSnapshot`]s.

use crate::geocode::{self, UNKNOWN_LOCATION};
use crate::types::{
    describe_wmo_code, Coordinates, CurrentConditions, DayForecast, WeatherError, WeatherSnapshot,
};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";
const USER_AGENT: &str = "Picko/0.1.0";

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
                            precipitation_probability_max,wind_speed_10m_max";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    weather_code: i32,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<f64>,
}

fn entry<T: Copy>(values: &[T], field: &str, index: usize) -> Result<T, WeatherError> {
    values
        .get(index)
        .copied()
        .ok_or_else(|| WeatherError::Parse(format!("daily.{} has no entry {}", field, index)))
}

impl DailyBlock {
    fn day(&self, index: usize) -> Result<DayForecast, WeatherError> {
        let weather_code = entry(&self.weather_code, "weather_code", index)?;
        let high = entry(&self.temperature_2m_max, "temperature_2m_max", index)?;
        let low = entry(&self.temperature_2m_min, "temperature_2m_min", index)?;
        let wind = entry(&self.wind_speed_10m_max, "wind_speed_10m_max", index)?;
        // Open-Meteo reports null probabilities for some models
        let precipitation = self
            .precipitation_probability_max
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(0.0);

        Ok(DayForecast {
            high: high.round(),
            low: low.round(),
            description: describe_wmo_code(weather_code).to_string(),
            weather_code,
            precipitation_chance: precipitation.round().clamp(0.0, 100.0) as u8,
            wind_speed: wind.round(),
        })
    }
}

/// Forecast client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    forecast_url: String,
    geocode_url: String,
}

impl WeatherProvider {
    /// Create a provider against the given forecast and geocoding endpoints.
    pub fn with_urls(
        forecast_url: impl Into<String>,
        geocode_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            forecast_url: forecast_url.into(),
            geocode_url: geocode_url.into(),
        })
    }

    /// Fetch current conditions plus today's and tomorrow's forecast.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, coords: Coordinates) -> Result<WeatherSnapshot, WeatherError> {
        let latitude = coords.latitude.to_string();
        let longitude = coords.longitude.to_string();
        let params = [
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("current", CURRENT_FIELDS),
            ("daily", DAILY_FIELDS),
            ("temperature_unit", "fahrenheit"),
            ("wind_speed_unit", "mph"),
            ("precipitation_unit", "inch"),
            ("timezone", "auto"),
            ("forecast_days", "2"),
        ];

        let response = self
            .client
            .get(&self.forecast_url)
            .query(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status().as_u16()));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let location = geocode::reverse_geocode(&self.client, &self.geocode_url, coords)
            .await
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

        let current = CurrentConditions {
            temperature: body.current.temperature_2m.round(),
            feels_like: body.current.apparent_temperature.round(),
            description: describe_wmo_code(body.current.weather_code).to_string(),
            weather_code: body.current.weather_code,
            wind_speed: body.current.wind_speed_10m.round(),
            humidity: body.current.relative_humidity_2m.round().clamp(0.0, 100.0) as u8,
        };

        let snapshot = WeatherSnapshot {
            location,
            current,
            today: body.daily.day(0)?,
            tomorrow: body.daily.day(1)?,
        };

        tracing::info!(
            "Fetched weather for {}: {}°F {}",
            snapshot.location,
            snapshot.current.temperature,
            snapshot.current.description
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PORTLAND: Coordinates = Coordinates {
        latitude: 45.5,
        longitude: -122.7,
    };

    fn forecast_body() -> serde_json::Value {
        serde_json::json!({
            "current": {
                "temperature_2m": 41.6,
                "relative_humidity_2m": 82,
                "apparent_temperature": 36.2,
                "weather_code": 61,
                "wind_speed_10m": 9.4
            },
            "daily": {
                "weather_code": [61, 71],
                "temperature_2m_max": [45.2, 37.8],
                "temperature_2m_min": [33.9, 28.1],
                "precipitation_probability_max": [80, null],
                "wind_speed_10m_max": [12.3, 6.6]
            }
        })
    }

    async fn provider_for(server: &MockServer) -> WeatherProvider {
        WeatherProvider::with_urls(
            format!("{}/v1/forecast", server.uri()),
            format!("{}/reverse", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_builds_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .and(query_param("forecast_days", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": { "city": "Portland" }
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let snapshot = provider.fetch(PORTLAND).await.unwrap();

        assert_eq!(snapshot.location, "Portland");
        assert_eq!(snapshot.current.temperature, 42.0);
        assert_eq!(snapshot.current.feels_like, 36.0);
        assert_eq!(snapshot.current.humidity, 82);
        assert_eq!(snapshot.current.description, "Light Rain");
        assert_eq!(snapshot.today.high, 45.0);
        assert_eq!(snapshot.today.precipitation_chance, 80);
        assert_eq!(snapshot.tomorrow.high, 38.0);
        assert_eq!(snapshot.tomorrow.low, 28.0);
        assert_eq!(snapshot.tomorrow.description, "Light Snow");
        assert_eq!(snapshot.tomorrow.wind_speed, 7.0);
    }

    #[tokio::test]
    async fn test_null_precipitation_counts_as_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let snapshot = provider.fetch(PORTLAND).await.unwrap();

        assert_eq!(snapshot.tomorrow.precipitation_chance, 0);
        // Geocoder has no mock mounted, so the label falls back
        assert_eq!(snapshot.location, UNKNOWN_LOCATION);
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let result = provider.fetch(PORTLAND).await;
        assert!(matches!(result, Err(WeatherError::Status(500))));
    }

    #[tokio::test]
    async fn test_short_daily_arrays_are_parse_errors() {
        let server = MockServer::start().await;
        let mut body = forecast_body();
        body["daily"]["temperature_2m_max"] = serde_json::json!([45.2]);
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let result = provider.fetch(PORTLAND).await;
        assert!(matches!(result, Err(WeatherError::Parse(_))));
    }
}
