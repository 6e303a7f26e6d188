//! Error types and handling for the weather reporter

use thiserror::Error;

use crate::provider::ProviderError;

/// Main error type for the weather reporter
#[derive(Error, Debug)]
pub enum ReporterError {
    /// Configuration-related errors (settings, credentials, locations file)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Forecast provider failures, tagged with the location they belong to
    #[error("Forecast for {location} failed: {source}")]
    Provider {
        location: String,
        #[source]
        source: ProviderError,
    },

    /// Report delivery errors
    #[error("Output error: {message}")]
    Output { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ReporterError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Wrap a provider error for the named location
    pub fn provider<S: Into<String>>(location: S, source: ProviderError) -> Self {
        Self::Provider {
            location: location.into(),
            source,
        }
    }

    /// Create a new output error
    pub fn output<S: Into<String>>(message: S) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ReporterError::Config { message } => {
                format!("Configuration error: {message}. Please check your settings and data files.")
            }
            ReporterError::Provider { location, source } => match source {
                ProviderError::Unauthorized => {
                    format!("No forecast for {location}: the weather service rejected the API key.")
                }
                ProviderError::Request(_) => format!(
                    "No forecast for {location}: unable to reach the weather service. Please check your internet connection."
                ),
                other => format!("No forecast for {location}: {other}"),
            },
            ReporterError::Output { message } => format!("Could not write report: {message}"),
            ReporterError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
