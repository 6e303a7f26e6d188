//! Report assembly: forecast windows and the hourly summary
//!
//! A report covers the hour containing the request time plus the hours that
//! follow it, and the local day of the request plus the days that follow it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{MAX_DAILY_POINTS, MAX_HOURLY_POINTS, ReporterConfig};
use crate::models::{DailyPoint, Forecast, HourlyPoint, LocalZone, Location, Units};

/// Window sizes and units applied to every report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSettings {
    pub hourly_hours: usize,
    pub daily_days: usize,
    pub units: Units,
    pub concurrency: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            hourly_hours: MAX_HOURLY_POINTS,
            daily_days: MAX_DAILY_POINTS,
            units: Units::Metric,
            concurrency: 1,
        }
    }
}

impl ReportSettings {
    #[must_use]
    pub fn from_config(config: &ReporterConfig) -> Self {
        Self {
            hourly_hours: config.report.hourly_hours,
            daily_days: config.report.daily_days,
            units: config.provider.units,
            concurrency: config.report.concurrency,
        }
    }
}

/// Minimum and maximum temperature over the hourly window and whether any
/// hour brings rain or snow
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlySummary {
    pub min_temperature: f32,
    pub max_temperature: f32,
    pub precipitation_expected: bool,
}

impl HourlySummary {
    /// Summarise a window; `None` when it is empty
    #[must_use]
    pub fn from_points(points: &[HourlyPoint]) -> Option<Self> {
        let first = points.first()?;
        let summary = points.iter().fold(
            Self {
                min_temperature: first.temperature,
                max_temperature: first.temperature,
                precipitation_expected: false,
            },
            |acc, point| Self {
                min_temperature: acc.min_temperature.min(point.temperature),
                max_temperature: acc.max_temperature.max(point.temperature),
                precipitation_expected: acc.precipitation_expected
                    || point.condition.precipitation().is_expected(),
            },
        );
        Some(summary)
    }
}

/// Forecast for one location, cut to the report windows
#[derive(Debug, Clone)]
pub struct Report {
    pub location: Location,
    pub generated_at: DateTime<Utc>,
    pub zone: LocalZone,
    pub utc_offset_seconds: i32,
    pub units: Units,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyPoint>,
    pub summary: Option<HourlySummary>,
}

impl Report {
    /// Build a report from a forecast as seen at `now`
    #[must_use]
    pub fn build(
        location: Location,
        forecast: &Forecast,
        now: DateTime<Utc>,
        settings: &ReportSettings,
    ) -> Self {
        let zone = forecast.zone();
        let hourly = select_hourly_window(&forecast.hourly, now, settings.hourly_hours);
        let daily = select_daily_window(&forecast.daily, now, zone, settings.daily_days);
        let summary = HourlySummary::from_points(&hourly);

        Self {
            location,
            generated_at: now,
            zone,
            utc_offset_seconds: forecast.utc_offset_seconds,
            units: settings.units,
            hourly,
            daily,
            summary,
        }
    }
}

/// Earliest hourly points relative to `now`, at most `limit` (capped at 48).
///
/// The hour containing `now` is kept; hours that have fully elapsed are not.
#[must_use]
pub fn select_hourly_window(
    points: &[HourlyPoint],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<HourlyPoint> {
    let mut upcoming: Vec<&HourlyPoint> = points.iter().filter(|p| p.end() > now).collect();
    upcoming.sort_by_key(|p| p.time);
    upcoming
        .into_iter()
        .take(limit.min(MAX_HOURLY_POINTS))
        .cloned()
        .collect()
}

/// Earliest daily points relative to `now`, at most `limit` (capped at 7).
///
/// Days are compared in the location's time zone; today is kept.
#[must_use]
pub fn select_daily_window(
    points: &[DailyPoint],
    now: DateTime<Utc>,
    zone: LocalZone,
    limit: usize,
) -> Vec<DailyPoint> {
    let today = zone.local_date(now);
    let mut upcoming: Vec<&DailyPoint> = points
        .iter()
        .filter(|p| zone.local_date(p.time) >= today)
        .collect();
    upcoming.sort_by_key(|p| p.time);
    upcoming
        .into_iter()
        .take(limit.min(MAX_DAILY_POINTS))
        .cloned()
        .collect()
}
