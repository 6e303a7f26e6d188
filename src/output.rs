//! Report delivery: console and dated text files

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::ReporterError;
use crate::config::OutputMode;
use crate::format::RenderedReport;

/// Destination for rendered reports
pub trait ReportSink: Send + Sync {
    /// Deliver one location's report
    fn emit(&self, report: &RenderedReport) -> crate::Result<()>;
}

impl<T: ReportSink + ?Sized> ReportSink for Box<T> {
    fn emit(&self, report: &RenderedReport) -> crate::Result<()> {
        (**self).emit(report)
    }
}

/// Prints hourly then daily text to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn emit(&self, report: &RenderedReport) -> crate::Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", report.hourly)?;
        writeln!(stdout, "{}", report.daily)?;
        stdout.flush()?;
        Ok(())
    }
}

/// Writes `YYYY_MM_DD_<Place>_Hourly_Forecast.txt` and
/// `YYYY_MM_DD_<Place>_Daily_Forecast.txt` into a directory
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for one part ("Hourly" or "Daily") of a report
    #[must_use]
    pub fn file_name(report: &RenderedReport, kind: &str) -> String {
        let place: String = report
            .place
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c => c,
            })
            .collect();
        format!(
            "{}_{place}_{kind}_Forecast.txt",
            report.date.format("%Y_%m_%d")
        )
    }

    fn write(&self, name: String, contents: &str) -> crate::Result<()> {
        let path = self.dir.join(name);
        std::fs::write(&path, contents).map_err(|e| {
            ReporterError::output(format!("Failed to write {}: {e}", path.display()))
        })?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl ReportSink for FileSink {
    fn emit(&self, report: &RenderedReport) -> crate::Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ReporterError::output(format!(
                "Failed to create output directory {}: {e}",
                self.dir.display()
            ))
        })?;
        self.write(Self::file_name(report, "Hourly"), &report.hourly)?;
        self.write(Self::file_name(report, "Daily"), &report.daily)?;
        info!("Wrote forecast files for {}", report.place);
        Ok(())
    }
}

/// Sink for the configured output mode
#[must_use]
pub fn sink_for(mode: OutputMode, dir: impl Into<PathBuf>) -> Box<dyn ReportSink> {
    match mode {
        OutputMode::Console => Box::new(ConsoleSink),
        OutputMode::Files => Box::new(FileSink::new(dir)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rendered(place: &str) -> RenderedReport {
        RenderedReport {
            place: place.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            hourly: "hourly text\n".to_string(),
            daily: "daily text\n".to_string(),
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            FileSink::file_name(&rendered("Kesten"), "Hourly"),
            "2025_03_09_Kesten_Hourly_Forecast.txt"
        );
        assert_eq!(
            FileSink::file_name(&rendered("Bernkastel/Kues"), "Daily"),
            "2025_03_09_Bernkastel_Kues_Daily_Forecast.txt"
        );
    }

    #[test]
    fn test_file_sink_writes_both_parts() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("reports"));

        sink.emit(&rendered("Trier")).unwrap();

        let hourly_path = sink.dir().join("2025_03_09_Trier_Hourly_Forecast.txt");
        let daily_path = sink.dir().join("2025_03_09_Trier_Daily_Forecast.txt");
        let hourly = std::fs::read_to_string(hourly_path).unwrap();
        let daily = std::fs::read_to_string(daily_path).unwrap();
        assert_eq!(hourly, "hourly text\n");
        assert_eq!(daily, "daily text\n");
    }

    #[test]
    fn test_file_sink_reports_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let err = FileSink::new(&blocker).emit(&rendered("Trier")).unwrap_err();
        assert!(matches!(err, ReporterError::Output { .. }));
    }

    #[test]
    fn test_boxed_sink_delegates() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink_for(OutputMode::Files, dir.path());
        sink.emit(&rendered("Hamburg")).unwrap();
        assert!(dir.path().join("2025_03_09_Hamburg_Daily_Forecast.txt").exists());
    }
}
