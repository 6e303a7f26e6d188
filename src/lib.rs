//! `weather-report` - hourly and daily weather forecasts for a list of places
//!
//! This library fetches forecasts from a weather provider, cuts them to the
//! next 48 hours and 7 days, and renders plain-text reports per location.

pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod output;
pub mod provider;
pub mod report;
pub mod reporter;
pub mod telemetry;

// Re-export core types for public API
pub use config::{OutputMode, ReporterConfig};
pub use error::ReporterError;
pub use format::{RenderedReport, format_report};
pub use models::{Forecast, Location, Units};
pub use output::{ConsoleSink, FileSink, ReportSink, sink_for};
pub use provider::{ForecastProvider, OpenWeatherMapClient, ProviderError};
pub use report::{Report, ReportSettings};
pub use reporter::{ForecastReporter, LocationOutcome, RunSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ReporterError>;
