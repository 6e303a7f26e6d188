//! Forecast points and the validated provider forecast

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::WeatherCondition;

/// One hour of forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    /// Start of the hour (UTC)
    pub time: DateTime<Utc>,
    pub temperature: f32,
    pub feels_like: f32,
    /// Wind speed in provider units (m/s metric, mph imperial)
    pub wind_speed: f32,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: u16,
    /// Probability of precipitation, 0.0 to 1.0
    pub precipitation_probability: f32,
    /// Rain plus snow over the hour in mm
    pub precipitation_mm: f32,
    pub condition: WeatherCondition,
}

impl HourlyPoint {
    /// End of the hour this point covers, saturating at the latest
    /// representable time
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.time
            .checked_add_signed(TimeDelta::hours(1))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Temperatures across one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperatures {
    pub min: f32,
    pub max: f32,
    pub day: f32,
    pub night: f32,
    pub evening: f32,
    pub morning: f32,
}

/// Feels-like temperatures across one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFeelsLike {
    pub day: f32,
    pub night: f32,
    pub evening: f32,
    pub morning: f32,
}

/// One day of forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// Representative time of the day (UTC, usually local noon)
    pub time: DateTime<Utc>,
    /// Absent during polar day or night
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub temperatures: DailyTemperatures,
    pub feels_like: DailyFeelsLike,
    pub wind_speed: f32,
    pub wind_direction: u16,
    /// Probability of precipitation, 0.0 to 1.0
    pub precipitation_probability: f32,
    pub rain_mm: f32,
    pub snow_mm: f32,
    pub condition: WeatherCondition,
}

/// Time zone a location's times are shown in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalZone {
    /// IANA zone, follows daylight saving changes inside the forecast range
    Named(Tz),
    /// Fixed offset from UTC
    Fixed(FixedOffset),
}

impl LocalZone {
    /// Resolve the provider's zone name, falling back to the fixed offset
    #[must_use]
    pub fn resolve(timezone: &str, utc_offset_seconds: i32) -> Self {
        match timezone.parse::<Tz>() {
            Ok(tz) => Self::Named(tz),
            Err(_) => Self::Fixed(
                FixedOffset::east_opt(utc_offset_seconds).unwrap_or_else(|| Utc.fix()),
            ),
        }
    }

    #[must_use]
    pub fn localize(&self, time: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Named(tz) => time.with_timezone(tz).fixed_offset(),
            Self::Fixed(offset) => time.with_timezone(offset),
        }
    }

    #[must_use]
    pub fn local_date(&self, time: DateTime<Utc>) -> NaiveDate {
        self.localize(time).date_naive()
    }
}

/// A provider forecast after validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    /// IANA time zone name of the location, e.g. "Europe/Berlin"
    pub timezone: String,
    /// Current offset from UTC in seconds
    pub utc_offset_seconds: i32,
    /// Hourly points in provider order
    pub hourly: Vec<HourlyPoint>,
    /// Daily points in provider order
    pub daily: Vec<DailyPoint>,
}

impl Forecast {
    #[must_use]
    pub fn zone(&self) -> LocalZone {
        LocalZone::resolve(&self.timezone, self.utc_offset_seconds)
    }
}
