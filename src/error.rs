//! Error types and handling for the trip planner

use thiserror::Error;

/// Main error type for the trip planner
#[derive(Error, Debug)]
pub enum TripPlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors, raised before any retrieval happens
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// No attraction in the dataset matches the requested destination
    #[error("No attractions found for destination '{destination}'")]
    NoMatch { destination: String },

    /// Dataset loading or consistency errors
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// External service communication errors (embedding or chat endpoints)
    #[error("API error: {message}")]
    Api { message: String },

    /// Document or map-link generation errors
    #[error("Render error: {message}")]
    Render { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TripPlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new no-match error for a destination
    pub fn no_match<S: Into<String>>(destination: S) -> Self {
        Self::NoMatch {
            destination: destination.into(),
        }
    }

    /// Create a new dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripPlannerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TripPlannerError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TripPlannerError::NoMatch { destination } => {
                format!(
                    "No attractions found for '{destination}'. Try a nearby city or the state name."
                )
            }
            TripPlannerError::Dataset { .. } => {
                "The attraction dataset could not be loaded.".to_string()
            }
            TripPlannerError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            TripPlannerError::Render { .. } => {
                "Could not generate the document. Please try again.".to_string()
            }
            TripPlannerError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
            TripPlannerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }

    /// Short machine-readable kind, used by the HTTP layer
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            TripPlannerError::Config { .. } => "config",
            TripPlannerError::Validation { .. } => "invalid_input",
            TripPlannerError::NoMatch { .. } => "no_match",
            TripPlannerError::Dataset { .. } => "dataset",
            TripPlannerError::Api { .. } => "api",
            TripPlannerError::Render { .. } => "render",
            TripPlannerError::Cache { .. } => "cache",
            TripPlannerError::Io { .. } => "io",
        }
    }
}

impl From<reqwest::Error> for TripPlannerError {
    fn from(err: reqwest::Error) -> Self {
        TripPlannerError::api(err.to_string())
    }
}

impl From<csv::Error> for TripPlannerError {
    fn from(err: csv::Error) -> Self {
        TripPlannerError::dataset(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = TripPlannerError::config("missing API key");
        assert!(matches!(config_err, TripPlannerError::Config { .. }));

        let validation_err = TripPlannerError::validation("days must be positive");
        assert!(matches!(validation_err, TripPlannerError::Validation { .. }));

        let no_match = TripPlannerError::no_match("Atlantis");
        assert!(matches!(no_match, TripPlannerError::NoMatch { .. }));
        assert_eq!(no_match.kind(), "no_match");
    }

    #[test]
    fn test_user_messages() {
        let validation_err = TripPlannerError::validation("days must be positive");
        assert!(validation_err.user_message().contains("days must be positive"));

        let no_match = TripPlannerError::no_match("Atlantis");
        assert!(no_match.user_message().contains("No attractions found"));
        assert!(no_match.user_message().contains("Atlantis"));

        let render_err = TripPlannerError::render("font table missing");
        assert!(render_err.user_message().contains("try again"));
        assert!(!render_err.user_message().contains("font table"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TripPlannerError = io_err.into();
        assert!(matches!(err, TripPlannerError::Io { .. }));
    }
}
