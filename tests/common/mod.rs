//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde_json::{Value, json};

use weather_report::models::{
    DailyFeelsLike, DailyPoint, DailyTemperatures, Forecast, HourlyPoint, Location,
    WeatherCondition,
};
use weather_report::{ForecastProvider, ProviderError, RenderedReport, ReportSink};

/// Fixed "now" used across tests: Monday 5 May 2025, 10:20 UTC
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 5, 10, 20, 0).unwrap()
}

/// Start of the hour containing `now()`
pub fn hour_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap()
}

pub fn location(name: &str) -> Location {
    Location::new(name, 49.9, 6.96)
}

fn condition(id: u16, description: &str) -> WeatherCondition {
    WeatherCondition {
        id,
        main: "Test".to_string(),
        description: description.to_string(),
    }
}

pub fn hourly_point(time: DateTime<Utc>, temperature: f32) -> HourlyPoint {
    HourlyPoint {
        time,
        temperature,
        feels_like: temperature - 1.5,
        wind_speed: 3.0,
        wind_direction: 200,
        precipitation_probability: 0.1,
        precipitation_mm: 0.0,
        condition: condition(802, "scattered clouds"),
    }
}

pub fn daily_point(time: DateTime<Utc>) -> DailyPoint {
    DailyPoint {
        time,
        sunrise: Some(time - TimeDelta::hours(6)),
        sunset: Some(time + TimeDelta::hours(8)),
        temperatures: DailyTemperatures {
            min: 6.0,
            max: 16.0,
            day: 15.0,
            night: 7.0,
            evening: 12.0,
            morning: 8.0,
        },
        feels_like: DailyFeelsLike {
            day: 14.0,
            night: 6.0,
            evening: 11.0,
            morning: 7.0,
        },
        wind_speed: 4.0,
        wind_direction: 270,
        precipitation_probability: 0.2,
        rain_mm: 0.0,
        snow_mm: 0.0,
        condition: condition(800, "clear sky"),
    }
}

/// Forecast in UTC with `hours` hourly points from `hour_start()` and `days`
/// daily points at noon from today
pub fn forecast(hours: i64, days: i64) -> Forecast {
    let noon = Utc.with_ymd_and_hms(2025, 5, 5, 12, 0, 0).unwrap();
    Forecast {
        timezone: "UTC".to_string(),
        utc_offset_seconds: 0,
        hourly: (0..hours)
            .map(|i| hourly_point(hour_start() + TimeDelta::hours(i), 10.0 + i as f32 * 0.1))
            .collect(),
        daily: (0..days)
            .map(|i| daily_point(noon + TimeDelta::days(i)))
            .collect(),
    }
}

/// Provider returning a fixed forecast, failing for selected place names
pub struct MockProvider {
    forecast: Forecast,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(forecast: Forecast) -> Self {
        Self {
            forecast,
            failing: HashSet::new(),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_for(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForecastProvider for MockProvider {
    async fn fetch_forecast(&self, location: &Location) -> Result<Forecast, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&location.name) {
            return Err(ProviderError::ServiceUnavailable("HTTP 503".to_string()));
        }
        Ok(self.forecast.clone())
    }
}

/// Sink that keeps every report it receives
#[derive(Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<RenderedReport>>,
}

impl RecordingSink {
    pub fn reports(&self) -> Vec<RenderedReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn places(&self) -> Vec<String> {
        self.reports().into_iter().map(|r| r.place).collect()
    }
}

impl ReportSink for RecordingSink {
    fn emit(&self, report: &RenderedReport) -> weather_report::Result<()> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

/// One Call response body with `hours` hourly and `days` daily entries
/// starting at `hour_start()`
pub fn onecall_body(hours: i64, days: i64) -> Value {
    let start = hour_start().timestamp();
    let noon = start + 2 * 3600;
    let hourly: Vec<Value> = (0..hours)
        .map(|i| {
            json!({
                "dt": start + i * 3600,
                "temp": 11.0,
                "feels_like": 9.5,
                "wind_speed": 5.0,
                "wind_deg": 225,
                "pop": 0.4,
                "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds"}]
            })
        })
        .collect();
    let daily: Vec<Value> = (0..days)
        .map(|i| {
            let dt = noon + i * 86_400;
            json!({
                "dt": dt,
                "sunrise": dt - 21_600,
                "sunset": dt + 28_800,
                "temp": {"day": 14.0, "min": 7.0, "max": 15.0, "night": 8.0, "eve": 12.0, "morn": 9.0},
                "feels_like": {"day": 13.0, "night": 7.0, "eve": 11.0, "morn": 8.0},
                "wind_speed": 5.0,
                "wind_deg": 250,
                "pop": 0.8,
                "rain": 3.0,
                "weather": [{"id": 500, "main": "Rain", "description": "light rain"}]
            })
        })
        .collect();
    json!({
        "lat": 49.9,
        "lon": 6.96,
        "timezone": "UTC",
        "timezone_offset": 0,
        "hourly": hourly,
        "daily": daily
    })
}
