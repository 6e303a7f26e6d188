//! Location model and the locations data file

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ReporterError;

/// A place to report on
///
/// Accepts both `{name, latitude, longitude}` and the capitalised
/// `{Place, Latitude, Longitude, Language}` record spelling.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Place name used in report headings and file names
    #[serde(alias = "Place")]
    pub name: String,
    /// Latitude in decimal degrees
    #[serde(alias = "Latitude")]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(alias = "Longitude")]
    pub longitude: f64,
    /// Language code for condition descriptions, e.g. "de"
    #[serde(default, alias = "Language")]
    pub language: Option<String>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            language: None,
        }
    }

    /// Builder-style language override
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!(
                "latitude must be between -90 and 90, got {}",
                self.latitude
            ));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!(
                "longitude must be between -180 and 180, got {}",
                self.longitude
            ));
        }
        Ok(())
    }
}

/// Load and validate the locations file.
///
/// Any unreadable or invalid record aborts loading with a configuration error
/// naming that record.
pub fn load_locations(path: impl AsRef<Path>) -> crate::Result<Vec<Location>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ReporterError::config(format!(
            "Unable to read locations file {}: {e}",
            path.display()
        ))
    })?;
    let locations = parse_locations(&contents)?;
    debug!(
        "Loaded {} locations from {}",
        locations.len(),
        path.display()
    );
    Ok(locations)
}

/// Parse the JSON contents of a locations file
pub fn parse_locations(contents: &str) -> crate::Result<Vec<Location>> {
    let document: Value = serde_json::from_str(contents)
        .map_err(|e| ReporterError::config(format!("Locations file is not valid JSON: {e}")))?;

    let Value::Array(records) = document else {
        return Err(ReporterError::config(
            "Locations file must contain a JSON array of location records",
        ));
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let label = record_label(index, &record);
            let location: Location = serde_json::from_value(record)
                .map_err(|e| ReporterError::config(format!("{label} is invalid: {e}")))?;
            location
                .validate()
                .map_err(|reason| ReporterError::config(format!("{label} is invalid: {reason}")))?;
            Ok(location)
        })
        .collect()
}

fn record_label(index: usize, record: &Value) -> String {
    let name = record
        .get("name")
        .or_else(|| record.get("Place"))
        .and_then(Value::as_str);
    match name {
        Some(name) => format!("Location record #{} ({name})", index + 1),
        None => format!("Location record #{}", index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_records() {
        let locations = parse_locations(
            r#"[{"name": "Trier", "latitude": 49.75, "longitude": 6.64},
                {"name": "Kesten", "latitude": 49.9, "longitude": 6.96, "language": "de"}]"#,
        )
        .unwrap();

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0], Location::new("Trier", 49.75, 6.64));
        assert_eq!(locations[1].language.as_deref(), Some("de"));
    }

    #[test]
    fn test_parse_capitalised_records() {
        let locations = parse_locations(
            r#"[{"Place": "Hamburg", "Latitude": 53.55, "Longitude": 9.99, "Language": "en"}]"#,
        )
        .unwrap();

        assert_eq!(locations[0].name, "Hamburg");
        assert_eq!(locations[0].latitude, 53.55);
        assert_eq!(locations[0].language.as_deref(), Some("en"));
    }

    #[test]
    fn test_empty_list_is_valid() {
        assert!(parse_locations("[]").unwrap().is_empty());
    }

    #[test]
    fn test_missing_field_names_record() {
        let err = parse_locations(
            r#"[{"name": "Trier", "latitude": 49.75, "longitude": 6.64},
                {"name": "Nowhere", "latitude": 12.0}]"#,
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(matches!(err, ReporterError::Config { .. }));
        assert!(message.contains("#2"), "{message}");
        assert!(message.contains("Nowhere"), "{message}");
        assert!(message.contains("longitude"), "{message}");
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let err = parse_locations(r#"[{"name": "Pole", "latitude": 95.0, "longitude": 0.0}]"#)
            .unwrap_err();
        assert!(err.to_string().contains("latitude must be between -90 and 90"));
    }

    #[test]
    fn test_unnamed_record_uses_index() {
        let err = parse_locations(r#"[{"latitude": 1.0, "longitude": 2.0}]"#).unwrap_err();
        assert!(err.to_string().contains("Location record #1 is invalid"));
    }

    #[test]
    fn test_non_array_document_rejected() {
        let err = parse_locations(r#"{"name": "Trier"}"#).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = load_locations("/definitely/not/here/locations_data.json").unwrap_err();
        assert!(matches!(err, ReporterError::Config { .. }));
    }

    #[test]
    fn test_format_coordinates() {
        let location = Location::new("Interlaken", 46.8182, 8.2275);
        assert_eq!(location.format_coordinates(), "46.8182, 8.2275");
    }
}
