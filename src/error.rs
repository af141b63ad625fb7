//! Error types for the grid
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Grid Error Enum ==
/// Unified error type for the grid.
///
/// `Configuration`, `Bootstrap` and `Assertion` are the three fatal outcomes of
/// a run; the remaining variants surface from region and listener operations.
#[derive(Error, Debug)]
pub enum GridError {
    /// A resolved setting could not be parsed into its target type
    #[error("Invalid configuration value [{value}] for [{name}]: {reason}")]
    Configuration {
        name: String,
        value: String,
        reason: String,
    },

    /// Cache construction or cache server start failed
    #[error("Failed to run operation [{operation}]")]
    Bootstrap {
        operation: String,
        #[source]
        source: Box<GridError>,
    },

    /// A post-condition of the demonstration run did not hold
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Program arguments were not supplied
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// No region with the given name exists in the cache
    #[error("Region not found: {0}")]
    RegionNotFound(String),

    /// Key not present in the region
    #[error("Key [{key}] not found in region [{region}]")]
    KeyNotFound { region: String, key: String },

    /// A region with the same name but a different shape already exists
    #[error("Region [{name}] already exists with shape [{existing}], requested [{requested}]")]
    RegionExists {
        name: String,
        existing: String,
        requested: String,
    },

    /// The cache tier does not support the requested operation
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Cache server listener failure
    #[error("Cache server error: {0}")]
    Listener(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GridError {
    // == Bootstrap Wrapper ==
    /// Wraps `source` as a bootstrap failure of `operation`.
    pub fn bootstrap(operation: impl Into<String>, source: GridError) -> Self {
        GridError::Bootstrap {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Returns true if this error should abort startup before any region work.
    pub fn is_fatal_startup(&self) -> bool {
        matches!(
            self,
            GridError::Configuration { .. } | GridError::Bootstrap { .. }
        )
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GridError {
    fn into_response(self) -> Response {
        let status = match &self {
            GridError::RegionNotFound(_) | GridError::KeyNotFound { .. } => StatusCode::NOT_FOUND,
            GridError::InvalidArguments(_) | GridError::Configuration { .. } => {
                StatusCode::BAD_REQUEST
            }
            GridError::RegionExists { .. } => StatusCode::CONFLICT,
            GridError::UnsupportedOperation(_) => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the grid.
pub type Result<T> = std::result::Result<T, GridError>;
