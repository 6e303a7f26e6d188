//! Data models for the weather reporter
//!
//! This module contains the core domain models organized by concern:
//! - Location: places to report on and the locations data file
//! - Weather: conditions, precipitation and units
//! - Forecast: hourly and daily forecast points

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{DailyFeelsLike, DailyPoint, DailyTemperatures, Forecast, HourlyPoint, LocalZone};
pub use location::{Location, load_locations, parse_locations};
pub use weather::{PrecipitationKind, Units, WeatherCondition, wind_direction_to_cardinal};
