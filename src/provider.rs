//! Forecast provider seam and the OpenWeatherMap One Call client
//!
//! The client issues a single GET per location; there is no retry or rate
//! limiting on our side.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::ReporterError;
use crate::config::ProviderConfig;
use crate::models::{Forecast, Location};

/// Forecast provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure: DNS, connect, timeout, body read
    #[error("Request failed: {0}")]
    Request(String),

    /// The provider rejected the API key
    #[error("Invalid API key (HTTP 401)")]
    Unauthorized,

    /// The provider throttled us
    #[error("Rate limit exceeded")]
    RateLimited,

    /// 5xx from the provider
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Any other non-success status
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// Body is not JSON or lacks expected fields
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Coordinates outside the valid range, rejected before any request
    #[error("Invalid coordinates ({latitude}, {longitude}): latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

/// Source of forecasts for a location
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Fetch the hourly and daily forecast for a location
    async fn fetch_forecast(&self, location: &Location) -> Result<Forecast, ProviderError>;
}

/// OpenWeatherMap One Call API client
#[derive(Debug)]
pub struct OpenWeatherMapClient {
    client: Client,
    config: ProviderConfig,
    api_key: String,
}

impl OpenWeatherMapClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no API key is configured or the HTTP
    /// client cannot be built.
    pub fn new(config: ProviderConfig) -> crate::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ReporterError::config(format!(
                    "No OpenWeatherMap API key configured. Set provider.api_key, \
                     WEATHER_REPORT_PROVIDER__API_KEY or add it to {}",
                    config.credentials_file
                ))
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("weather-report/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReporterError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn validate_coordinates(location: &Location) -> Result<(), ProviderError> {
        if !(-90.0..=90.0).contains(&location.latitude)
            || !(-180.0..=180.0).contains(&location.longitude)
        {
            return Err(ProviderError::InvalidCoordinates {
                latitude: location.latitude,
                longitude: location.longitude,
            });
        }
        Ok(())
    }

    /// Query parameters for a forecast request
    fn query_pairs(&self, location: &Location) -> Vec<(&'static str, String)> {
        let language = location
            .language
            .clone()
            .unwrap_or_else(|| self.config.language.clone());
        vec![
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("exclude", "current,minutely,alerts".to_string()),
            ("units", self.config.units.as_query().to_string()),
            ("lang", language),
            ("appid", self.api_key.clone()),
        ]
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherMapClient {
    #[instrument(
        skip(self, location),
        fields(location = %location.name, coordinates = %location.format_coordinates())
    )]
    async fn fetch_forecast(&self, location: &Location) -> Result<Forecast, ProviderError> {
        Self::validate_coordinates(location)?;

        debug!(url = %self.config.base_url, "Fetching forecast");
        let start_time = Instant::now();

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&self.query_pairs(location))
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Unauthorized);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if status.is_server_error() {
            return Err(ProviderError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let payload: onecall::OneCallResponse =
            serde_json::from_slice(&body).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        let forecast = payload.into_forecast()?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved {} hourly and {} daily points for {} in {:.3}s",
            forecast.hourly.len(),
            forecast.daily.len(),
            location.name,
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow forecast API response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(forecast)
    }
}

/// One Call API response structures and conversion to internal models
mod onecall {
    use chrono::{DateTime, TimeDelta, Utc};
    use serde::Deserialize;

    use super::ProviderError;
    use crate::models::{
        DailyFeelsLike, DailyPoint, DailyTemperatures, Forecast, HourlyPoint, WeatherCondition,
    };

    #[derive(Debug, Deserialize)]
    pub struct OneCallResponse {
        pub timezone: String,
        pub timezone_offset: i32,
        pub hourly: Option<Vec<Hourly>>,
        pub daily: Option<Vec<Daily>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Hourly {
        pub dt: i64,
        pub temp: f32,
        pub feels_like: f32,
        pub wind_speed: f32,
        #[serde(default)]
        pub wind_deg: u16,
        #[serde(default)]
        pub pop: f32,
        pub rain: Option<HourVolume>,
        pub snow: Option<HourVolume>,
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct HourVolume {
        #[serde(rename = "1h", default)]
        pub one_hour: f32,
    }

    #[derive(Debug, Deserialize)]
    pub struct Daily {
        pub dt: i64,
        #[serde(default)]
        pub sunrise: Option<i64>,
        #[serde(default)]
        pub sunset: Option<i64>,
        pub temp: DailyTemp,
        pub feels_like: DailyFeels,
        pub wind_speed: f32,
        #[serde(default)]
        pub wind_deg: u16,
        #[serde(default)]
        pub pop: f32,
        #[serde(default)]
        pub rain: Option<f32>,
        #[serde(default)]
        pub snow: Option<f32>,
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DailyTemp {
        pub day: f32,
        pub min: f32,
        pub max: f32,
        pub night: f32,
        pub eve: f32,
        pub morn: f32,
    }

    #[derive(Debug, Deserialize)]
    pub struct DailyFeels {
        pub day: f32,
        pub night: f32,
        pub eve: f32,
        pub morn: f32,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Condition {
        pub id: u16,
        pub main: String,
        pub description: String,
    }

    impl From<Condition> for WeatherCondition {
        fn from(condition: Condition) -> Self {
            Self {
                id: condition.id,
                main: condition.main,
                description: condition.description,
            }
        }
    }

    /// Times within a day of the representable range are rejected so window
    /// arithmetic on them cannot overflow
    fn timestamp(seconds: i64, field: &str) -> Result<DateTime<Utc>, ProviderError> {
        DateTime::from_timestamp(seconds, 0)
            .filter(|time| {
                time.checked_add_signed(TimeDelta::days(1)).is_some()
                    && time.checked_sub_signed(TimeDelta::days(1)).is_some()
            })
            .ok_or_else(|| ProviderError::Malformed(format!("{field} is out of range: {seconds}")))
    }

    /// Zero or missing sunrise/sunset means the sun does not rise or set that day
    fn optional_timestamp(
        seconds: Option<i64>,
        field: &str,
    ) -> Result<Option<DateTime<Utc>>, ProviderError> {
        match seconds {
            None | Some(0) => Ok(None),
            Some(seconds) => timestamp(seconds, field).map(Some),
        }
    }

    fn first_condition(
        weather: Vec<Condition>,
        field: &str,
    ) -> Result<WeatherCondition, ProviderError> {
        weather
            .into_iter()
            .next()
            .map(WeatherCondition::from)
            .ok_or_else(|| ProviderError::Malformed(format!("{field}.weather is empty")))
    }

    impl OneCallResponse {
        /// Validate the payload and convert it into a `Forecast`
        pub fn into_forecast(self) -> Result<Forecast, ProviderError> {
            let hourly = self
                .hourly
                .ok_or_else(|| ProviderError::Malformed("missing field `hourly`".to_string()))?;
            let daily = self
                .daily
                .ok_or_else(|| ProviderError::Malformed("missing field `daily`".to_string()))?;

            let hourly = hourly
                .into_iter()
                .enumerate()
                .map(|(i, hour)| {
                    let field = format!("hourly[{i}]");
                    let precipitation_mm = hour.rain.as_ref().map_or(0.0, |v| v.one_hour)
                        + hour.snow.as_ref().map_or(0.0, |v| v.one_hour);
                    Ok(HourlyPoint {
                        time: timestamp(hour.dt, &field)?,
                        temperature: hour.temp,
                        feels_like: hour.feels_like,
                        wind_speed: hour.wind_speed,
                        wind_direction: hour.wind_deg,
                        precipitation_probability: hour.pop,
                        precipitation_mm,
                        condition: first_condition(hour.weather, &field)?,
                    })
                })
                .collect::<Result<Vec<_>, ProviderError>>()?;

            let daily = daily
                .into_iter()
                .enumerate()
                .map(|(i, day)| {
                    let field = format!("daily[{i}]");
                    Ok(DailyPoint {
                        time: timestamp(day.dt, &field)?,
                        sunrise: optional_timestamp(day.sunrise, &field)?,
                        sunset: optional_timestamp(day.sunset, &field)?,
                        temperatures: DailyTemperatures {
                            min: day.temp.min,
                            max: day.temp.max,
                            day: day.temp.day,
                            night: day.temp.night,
                            evening: day.temp.eve,
                            morning: day.temp.morn,
                        },
                        feels_like: DailyFeelsLike {
                            day: day.feels_like.day,
                            night: day.feels_like.night,
                            evening: day.feels_like.eve,
                            morning: day.feels_like.morn,
                        },
                        wind_speed: day.wind_speed,
                        wind_direction: day.wind_deg,
                        precipitation_probability: day.pop,
                        rain_mm: day.rain.unwrap_or_default(),
                        snow_mm: day.snow.unwrap_or_default(),
                        condition: first_condition(day.weather, &field)?,
                    })
                })
                .collect::<Result<Vec<_>, ProviderError>>()?;

            Ok(Forecast {
                timezone: self.timezone,
                utc_offset_seconds: self.timezone_offset,
                hourly,
                daily,
            })
        }
    }
}
