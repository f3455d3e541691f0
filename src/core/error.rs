//! Error types for bodygraph
//!
//! This module provides structured error handling using thiserror.
//! Every failure is all-or-nothing: no partial chart ever escapes.

use thiserror::Error;

use crate::core::ephemeris::EphemerisError;

/// Result type alias for chart operations
pub type Result<T> = std::result::Result<T, ChartError>;

/// Errors that can occur while computing a chart
#[derive(Error, Debug)]
pub enum ChartError {
    /// Input rejected before any computation ran
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The ephemeris collaborator failed or timed out
    #[error("Ephemeris unavailable: {0}")]
    EphemerisUnavailable(#[from] EphemerisError),

    /// The design-instant search did not reach the tolerance
    #[error(
        "Solar arc search did not converge after {iterations} iterations \
         (residual {residual_degrees:.6}°): {reason}"
    )]
    SolarArcConvergence {
        iterations: usize,
        residual_degrees: f64,
        reason: String,
    },

    /// The type decision table matched no branch (a defect, never bad input)
    #[error("Classification invariant violated for defined centers [{defined_centers}]")]
    ClassificationInvariantViolation { defined_centers: String },

    /// The caller cancelled the computation
    #[error("Chart computation cancelled")]
    Cancelled,

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// IO error while reading configuration or tables
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A renderer produced output that is not valid UTF-8
    #[error("Render error: {0}")]
    Render(#[from] std::string::FromUtf8Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ChartError>,
    },
}

impl ChartError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ChartError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ChartError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ChartError::InvalidConfig {
            message: message.into(),
        }
    }

    /// The innermost error, looking through any context wrappers
    pub fn root(&self) -> &ChartError {
        match self {
            ChartError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// True for errors caused by the caller's input rather than the engine
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.root(),
            ChartError::InvalidInput { .. } | ChartError::InvalidConfig { .. }
        )
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}
