//! Plain-text rendering of reports
//!
//! Output is deterministic for a given report. All times are shown in the
//! location's local time.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{DailyPoint, HourlyPoint, Units, wind_direction_to_cardinal};
use crate::report::Report;

/// Rendered hourly and daily text for one location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    /// Place name of the location
    pub place: String,
    /// Local date the report was generated on
    pub date: NaiveDate,
    pub hourly: String,
    pub daily: String,
}

/// Render a report
#[must_use]
pub fn format_report(report: &Report) -> RenderedReport {
    RenderedReport {
        place: report.location.name.clone(),
        date: report.zone.local_date(report.generated_at),
        hourly: format_hourly(report),
        daily: format_daily(report),
    }
}

/// Describe an offset from UTC, e.g. "1 hour", "-5 hours", "+5:30 hours"
#[must_use]
pub fn utc_offset_label(seconds: i32) -> String {
    if seconds % 3600 == 0 {
        let hours = seconds / 3600;
        let unit = if hours.abs() == 1 { "hour" } else { "hours" };
        return format!("{hours} {unit}");
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    format!("{sign}{}:{:02} hours", abs / 3600, (abs % 3600) / 60)
}

fn whole(value: f32) -> i32 {
    value.round() as i32
}

fn percent(probability: f32) -> i32 {
    (probability * 100.0).round() as i32
}

fn heading(report: &Report, kind: &str) -> String {
    let generated = report.zone.localize(report.generated_at);
    format!(
        "{} {kind} Forecast.  Generated at {} local time (UTC Offset: {})\n\n",
        report.location.name,
        generated.format("%H:%M"),
        utc_offset_label(report.utc_offset_seconds)
    )
}

fn local_time(report: &Report, time: DateTime<Utc>, pattern: &str) -> String {
    report.zone.localize(time).format(pattern).to_string()
}

fn write_hour(out: &mut String, report: &Report, point: &HourlyPoint) {
    let units = report.units;
    let symbol = units.temperature_symbol();
    let _ = writeln!(out, "{}", local_time(report, point.time, "%a %e %B %Y, %H:%M"));
    let _ = write!(
        out,
        "    Temperature {:>2}{symbol} (feels like {:>2}{symbol}), wind speed {:>3}{} {}, {}, precipitation {:>3}%",
        whole(point.temperature),
        whole(point.feels_like),
        units.display_wind_speed(point.wind_speed),
        units.wind_label(),
        wind_direction_to_cardinal(point.wind_direction),
        point.condition.description,
        percent(point.precipitation_probability),
    );
    if point.precipitation_mm > 0.0 {
        let _ = write!(out, " ({:.1}mm)", point.precipitation_mm);
    }
    out.push_str("\n\n");
}

/// Hourly text: heading, one entry per hour, then the summary line
#[must_use]
pub fn format_hourly(report: &Report) -> String {
    let mut out = heading(report, "Hourly");

    for point in &report.hourly {
        write_hour(&mut out, report, point);
    }

    out.push('\n');
    match &report.summary {
        Some(summary) => {
            let symbol = report.units.temperature_symbol();
            let _ = write!(
                out,
                "Summary: Minimum temperature: {}{symbol}, maximum {}{symbol}, ",
                whole(summary.min_temperature),
                whole(summary.max_temperature)
            );
            if summary.precipitation_expected {
                out.push_str("Rain (or snow) expected!\n");
            } else {
                out.push_str("No rain expected!\n");
            }
        }
        None => out.push_str("Summary: No hourly forecast data available.\n"),
    }
    out
}

fn write_day(out: &mut String, report: &Report, point: &DailyPoint, units: Units) {
    let symbol = units.temperature_symbol();
    let sun = |time: Option<DateTime<Utc>>| {
        time.map_or_else(|| "--:--".to_string(), |t| local_time(report, t, "%H:%M"))
    };
    let t = &point.temperatures;
    let f = &point.feels_like;

    let _ = writeln!(
        out,
        "{}, Sunrise: {}, Sunset: {}",
        local_time(report, point.time, "%a %e %B %Y"),
        sun(point.sunrise),
        sun(point.sunset)
    );
    let _ = writeln!(
        out,
        "    Prevailing conditions:    {}, wind speed: {}{} {}",
        point.condition.description,
        units.display_wind_speed(point.wind_speed),
        units.wind_label(),
        wind_direction_to_cardinal(point.wind_direction)
    );
    let _ = writeln!(
        out,
        "    Temperatures:             Max {:>3}{symbol},    Min {:>3}{symbol}",
        whole(t.max),
        whole(t.min)
    );
    let _ = writeln!(
        out,
        "    day/night/evening/morning {:>3}{symbol},  {:>3}{symbol},  {:>3}{symbol},  {:>3}{symbol}",
        whole(t.day),
        whole(t.night),
        whole(t.evening),
        whole(t.morning)
    );
    let _ = writeln!(
        out,
        "    Feels like                {:>3}{symbol},  {:>3}{symbol},  {:>3}{symbol},  {:>3}{symbol}",
        whole(f.day),
        whole(f.night),
        whole(f.evening),
        whole(f.morning)
    );
    let _ = writeln!(
        out,
        "    Precipitation:            {:>3}% chance, rain {:.1}mm, snow {:.1}mm",
        percent(point.precipitation_probability),
        point.rain_mm,
        point.snow_mm
    );
    out.push('\n');
}

/// Daily text: heading and one block per day
#[must_use]
pub fn format_daily(report: &Report) -> String {
    let mut out = heading(report, "Daily");
    for point in &report.daily {
        write_day(&mut out, report, point, report.units);
    }
    out
}
