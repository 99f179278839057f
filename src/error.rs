use std::fmt;

use thiserror::Error;

use crate::models::Field;
use crate::validation::{FieldErrorKind, ValidationErrors};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Prediction,
    Weather,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Prediction => f.write_str("prediction"),
            Service::Weather => f.write_str("weather"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// The aggregate check failed; the field errors are carried along for
    /// inline display.
    #[error("Please fix the errors in the form before submitting.")]
    Invalid(ValidationErrors),

    #[error("Authentication token not available. Please sign out and sign in again.")]
    MissingCredential,

    /// Non-success status or transport failure from a remote service,
    /// already reduced to one user-facing message.
    #[error("{message}")]
    Upstream {
        service: Service,
        status: Option<u16>,
        message: String,
    },

    #[error("Please provide valid coordinates.")]
    InvalidCoordinates { field: Field, kind: FieldErrorKind },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file is not valid TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AppError {
    pub fn upstream(service: Service, status: Option<u16>, message: impl Into<String>) -> Self {
        AppError::Upstream {
            service,
            status,
            message: message.into(),
        }
    }
}
