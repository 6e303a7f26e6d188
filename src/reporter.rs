//! Per-location pipeline: fetch, window, format, emit

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

use crate::ReporterError;
use crate::format::format_report;
use crate::models::Location;
use crate::output::ReportSink;
use crate::provider::ForecastProvider;
use crate::report::{Report, ReportSettings};

/// Result for a single location
#[derive(Debug)]
pub struct LocationOutcome {
    pub location: String,
    pub result: Result<Report, ReporterError>,
}

/// Outcomes of one run, in input order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<LocationOutcome>,
}

impl RunSummary {
    /// Reports that were produced and emitted
    pub fn reports(&self) -> impl Iterator<Item = &Report> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Locations that failed, with their error
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ReporterError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.location.as_str(), e)))
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.reports().count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    /// True when no location failed (an empty run is a success)
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Produces one report per location from a forecast provider and hands it
/// to a sink.
///
/// A failure for one location is recorded in the summary and does not stop
/// the remaining locations.
pub struct ForecastReporter<P, S> {
    provider: P,
    sink: S,
    settings: ReportSettings,
}

impl<P, S> ForecastReporter<P, S>
where
    P: ForecastProvider,
    S: ReportSink,
{
    pub fn new(provider: P, sink: S, settings: ReportSettings) -> Self {
        Self {
            provider,
            sink,
            settings,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Report on every location as of the current time
    pub async fn run(&self, locations: &[Location]) -> RunSummary {
        self.run_at(locations, Utc::now()).await
    }

    /// Report on every location as of `now`.
    ///
    /// Up to `settings.concurrency` locations are in flight at once; outcomes
    /// keep the order of `locations`.
    pub async fn run_at(&self, locations: &[Location], now: DateTime<Utc>) -> RunSummary {
        let concurrency = self.settings.concurrency.max(1);
        info!(
            "Processing {} location(s), concurrency {concurrency}",
            locations.len()
        );

        let outcomes: Vec<LocationOutcome> = stream::iter(locations)
            .map(|location| async move {
                LocationOutcome {
                    location: location.name.clone(),
                    result: self.process(location, now).await,
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        let summary = RunSummary { outcomes };
        for (location, error) in summary.failures() {
            warn!(location, "No report produced: {error}");
        }
        info!(
            "Run complete: {} succeeded, {} failed",
            summary.succeeded(),
            summary.failed()
        );
        summary
    }

    #[instrument(skip(self, location, now), fields(location = %location.name))]
    async fn process(
        &self,
        location: &Location,
        now: DateTime<Utc>,
    ) -> Result<Report, ReporterError> {
        let forecast = self
            .provider
            .fetch_forecast(location)
            .await
            .map_err(|e| ReporterError::provider(&location.name, e))?;

        let report = Report::build(location.clone(), &forecast, now, &self.settings);
        self.sink.emit(&format_report(&report))?;
        Ok(report)
    }
}
