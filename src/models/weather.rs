//! Weather conditions, precipitation classification and unit handling

use serde::{Deserialize, Serialize};

/// Unit system requested from the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Celsius, wind in m/s (reported as kph)
    #[default]
    Metric,
    /// Fahrenheit, wind in mph
    Imperial,
}

impl Units {
    /// Value of the provider's `units` query parameter
    #[must_use]
    pub const fn as_query(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    #[must_use]
    pub const fn temperature_symbol(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    #[must_use]
    pub const fn wind_label(&self) -> &'static str {
        match self {
            Self::Metric => "kph",
            Self::Imperial => "mph",
        }
    }

    /// Convert a provider wind speed to the whole number shown in reports
    #[must_use]
    pub fn display_wind_speed(&self, raw: f32) -> i32 {
        match self {
            // m/s -> km/h
            Self::Metric => (raw * 3.6).round() as i32,
            Self::Imperial => raw.round() as i32,
        }
    }
}

/// Kind of precipitation implied by a provider condition id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrecipitationKind {
    None,
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
}

impl PrecipitationKind {
    /// Classify an OpenWeatherMap condition id.
    ///
    /// Groups: 2xx thunderstorm, 3xx drizzle, 5xx rain, 6xx snow. Everything
    /// from 700 upwards (atmosphere, clear, clouds) is dry.
    #[must_use]
    pub const fn from_condition_id(id: u16) -> Self {
        match id {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            500..=599 => Self::Rain,
            600..=699 => Self::Snow,
            _ => Self::None,
        }
    }

    #[must_use]
    pub const fn is_expected(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Prevailing weather condition of a forecast point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    /// Provider condition id
    pub id: u16,
    /// Condition group, e.g. "Rain"
    pub main: String,
    /// Localized description, e.g. "light rain"
    pub description: String,
}

impl WeatherCondition {
    #[must_use]
    pub fn precipitation(&self) -> PrecipitationKind {
        PrecipitationKind::from_condition_id(self.id)
    }
}

/// Convert wind direction from degrees to a 16-point compass label
#[must_use]
pub fn wind_direction_to_cardinal(degrees: u16) -> &'static str {
    match degrees % 360 {
        0..=11 | 349..=359 => "N",
        12..=33 => "NNE",
        34..=56 => "NE",
        57..=78 => "ENE",
        79..=101 => "E",
        102..=123 => "ESE",
        124..=146 => "SE",
        147..=168 => "SSE",
        169..=191 => "S",
        192..=213 => "SSW",
        214..=236 => "SW",
        237..=258 => "WSW",
        259..=281 => "W",
        282..=303 => "WNW",
        304..=326 => "NW",
        _ => "NNW",
    }
}
