use std::sync::Arc;

use picko_outfit::{
    DailyRecommendations, GenerationClient, KeyValueStore, OutfitAdvisor, PreferencesStore,
    RecommendationCache, SqliteStore, UserPreferences,
};
use picko_weather::{Coordinates, LocationError, WeatherProvider, WeatherSnapshot};

use crate::config::Config;
use crate::error::{AppError, ConfigError};

/// Application wiring: configuration, weather provider and outfit advisor.
pub struct App {
    config: Arc<Config>,
    weather: WeatherProvider,
    advisor: OutfitAdvisor,
}

impl App {
    /// Load and validate configuration, then build the app.
    pub fn load() -> Result<Self, AppError> {
        let config = Config::load().map_err(|e| ConfigError::ParseError(format!("{:#}", e)))?;

        let validation = config.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }
        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Self::with_config(config)
    }

    /// Build the app from an existing configuration, opening the SQLite
    /// database under `config_dir`.
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.config_dir)?;
        let db_path = config.database_path();
        tracing::debug!("Opening database at {}", db_path.display());
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(config, store)
    }

    /// Build the app over any key-value store.
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let weather = WeatherProvider::with_urls(
            config.weather.forecast_url.clone(),
            config.weather.geocode_url.clone(),
            config.weather.timeout(),
        )?;

        let client = GenerationClient::new(
            &config.generation.api_url,
            &config.generation.project_id,
            config.generation.timeout(),
        )?
        .with_max_tokens(config.generation.max_tokens);

        let cache = RecommendationCache::with_ttl(store.clone(), config.cache.ttl_ms());
        let advisor = OutfitAdvisor::new(client, cache, PreferencesStore::new(store));

        tracing::info!("Picko initialized");

        Ok(Self {
            config: Arc::new(config),
            weather,
            advisor,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn advisor(&self) -> &OutfitAdvisor {
        &self.advisor
    }

    /// Explicit coordinates win, then the configured default location.
    pub fn resolve_location(
        &self,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Coordinates, LocationError> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            (Some(_), None) | (None, Some(_)) => Err(LocationError::Unavailable(
                "both latitude and longitude are required".to_string(),
            )),
            (None, None) => self
                .config
                .weather
                .default_location()
                .ok_or_else(|| {
                    LocationError::Unavailable(
                        "no location given and no default configured".to_string(),
                    )
                }),
        }
    }

    /// Fetch the weather and both days' recommendations for `preferences`.
    pub async fn advise(
        &self,
        coords: Coordinates,
        preferences: &UserPreferences,
    ) -> Result<(WeatherSnapshot, DailyRecommendations), AppError> {
        let snapshot = self.weather.fetch(coords).await?;
        let recommendations = self.advisor.get_daily(&snapshot, preferences).await;
        Ok((snapshot, recommendations))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use picko_outfit::{ClothingStyle, MemoryStore};
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_with(config: Config) -> App {
        App::with_store(config, Arc::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_explicit_coordinates_win() {
        let mut config = Config::default();
        config.weather.default_latitude = Some(1.0);
        config.weather.default_longitude = Some(2.0);
        let app = app_with(config);

        let coords = app.resolve_location(Some(45.5), Some(-122.6)).unwrap();
        assert_eq!(coords.latitude, 45.5);
        assert_eq!(coords.longitude, -122.6);
    }

    #[test]
    fn test_default_location_used() {
        let mut config = Config::default();
        config.weather.default_latitude = Some(1.0);
        config.weather.default_longitude = Some(2.0);
        let app = app_with(config);

        let coords = app.resolve_location(None, None).unwrap();
        assert_eq!(coords.latitude, 1.0);
    }

    #[test]
    fn test_missing_location_is_unavailable() {
        let app = app_with(Config::default());
        assert!(matches!(
            app.resolve_location(None, None),
            Err(LocationError::Unavailable(_))
        ));
        assert!(matches!(
            app.resolve_location(Some(1.0), None),
            Err(LocationError::Unavailable(_))
        ));
    }

    #[test]
    fn test_with_config_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            config_dir: dir.path().join("picko"),
            ..Config::default()
        };

        let app = App::with_config(config).unwrap();
        assert!(app.config().database_path().exists());
        assert_eq!(app.advisor().cache().ttl_ms(), 43_200_000);
    }

    #[tokio::test]
    async fn test_advise_uses_given_preferences() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current": {
                    "temperature_2m": 50.0,
                    "relative_humidity_2m": 60,
                    "apparent_temperature": 48.0,
                    "weather_code": 2,
                    "wind_speed_10m": 5.0
                },
                "daily": {
                    "weather_code": [2, 3],
                    "temperature_2m_max": [55.0, 58.0],
                    "temperature_2m_min": [40.0, 42.0],
                    "precipitation_probability_max": [10, 20],
                    "wind_speed_10m_max": [8.0, 9.0]
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/generate/text"))
            .and(body_string_contains("7-year-old"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("SUMMARY: Layer up.\nCLOTHING: sweater, jeans"),
            )
            .expect(2)
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.generation.api_url = server.uri();
        config.weather.forecast_url = format!("{}/v1/forecast", server.uri());
        config.weather.geocode_url = format!("{}/reverse", server.uri());
        let app = app_with(config);

        // Nothing is stored, so the stored profile would say age 2
        let preferences = UserPreferences {
            child_age: 7,
            clothing_style: ClothingStyle::Girl,
            has_completed_setup: true,
        };
        let coords = Coordinates {
            latitude: 45.5,
            longitude: -122.6,
        };
        let (snapshot, recommendations) = app.advise(coords, &preferences).await.unwrap();

        assert_eq!(snapshot.today.high, 55.0);
        assert_eq!(recommendations.today.summary, "Layer up.");
        assert_eq!(recommendations.tomorrow.tokens(), ["sweater", "jeans"]);
    }
}
