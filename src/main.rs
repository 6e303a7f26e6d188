//! weather-report CLI
//!
//! Prints (or writes) hourly and daily forecast reports for every place in
//! the locations data file.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{error, info};

use weather_report::config::{OutputMode, ReporterConfig};
use weather_report::models::load_locations;
use weather_report::{ForecastReporter, OpenWeatherMapClient, ReportSettings, sink_for, telemetry};

/// Weather forecast reports for a list of places
#[derive(Parser, Debug)]
#[command(name = "weather-report")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, env = "WEATHER_REPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Locations data file, overrides `report.locations_file`
    #[arg(short, long)]
    locations: Option<PathBuf>,

    /// Where to send reports, overrides `report.output`
    #[arg(short, long, value_enum)]
    output: Option<OutputMode>,

    /// Directory for file output, overrides `report.output_dir`
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply_overrides(&self, config: &mut ReporterConfig) {
        if let Some(path) = &self.locations {
            config.report.locations_file = path.display().to_string();
        }
        if let Some(output) = self.output {
            config.report.output = output;
        }
        if let Some(dir) = &self.output_dir {
            config.report.output_dir = dir.display().to_string();
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every location produced a report
async fn run(cli: Cli) -> Result<bool> {
    let mut config = ReporterConfig::load_from_path(cli.config.clone())?;
    cli.apply_overrides(&mut config);

    let _telemetry = telemetry::init(&config.logging, cli.verbose)?;

    let started = Instant::now();
    println!("***** Weather Forecast program is starting *****");
    println!("Start time: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    let locations = load_locations(&config.report.locations_file)
        .with_context(|| format!("Cannot load {}", config.report.locations_file))?;
    info!(
        "Loaded {} location(s) from {}",
        locations.len(),
        config.report.locations_file
    );

    let provider = OpenWeatherMapClient::new(config.provider.clone())?;
    let sink = sink_for(config.report.output, &config.report.output_dir);
    let reporter = ForecastReporter::new(provider, sink, ReportSettings::from_config(&config));

    let summary = reporter.run(&locations).await;
    for (_, failure) in summary.failures() {
        eprintln!("{}", failure.user_message());
    }
    if config.report.output == OutputMode::Files {
        println!(
            "Wrote {} report(s) to {}",
            summary.succeeded(),
            config.report.output_dir
        );
    }

    println!("Finish time: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!(
        "Elapsed time: {:.2} seconds",
        started.elapsed().as_secs_f64()
    );
    println!("***** Weather Forecast program has finished *****");

    Ok(summary.is_success())
}
