//! Error handling.

use axum::{
    http::header,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use thiserror::Error;
use tracing::{event, Level};

use crate::schema::ColumnKind;

/// Pipeline error type
///
/// This type encapsulates the errors that may occur while loading the datasets and while
/// rendering charts. Load-time variants abort startup; the remainder map to an API error
/// response.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Error opening or reading a source file
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error splitting delimited text into records
    #[error("failed to parse delimited text")]
    Csv(#[from] csv::Error),

    /// A declared column is absent from the header row
    #[error("required column {column} is missing")]
    MissingColumn { column: &'static str },

    /// A cell could not be coerced to the type declared for its column
    #[error("line {line}: value {value:?} in column {column} is not a valid {kind}")]
    InvalidValue {
        line: u64,
        column: &'static str,
        kind: ColumnKind,
        value: String,
    },

    /// The decimal mark cannot be told apart from the delimiter
    #[error("decimal mark {0:?} must differ from the delimiter")]
    AmbiguousDecimalMark(char),

    /// A date field does not start with a 4-digit year
    #[error("date {value:?} does not start with a 4-digit year")]
    Format { value: String },

    /// Renaming a state label would overwrite an existing row
    #[error("renaming state {from} to {to} collides with an existing row for {year}")]
    Conflict {
        from: String,
        to: String,
        year: i32,
    },

    /// Min-max normalisation over a slice whose values are all equal
    #[error("cannot normalise {column}: every value in the selection equals {value}")]
    DegenerateRange { column: &'static str, value: f64 },

    /// No chart is served at the requested path
    #[error("no chart available at {path}")]
    NotFound { path: String },

    /// Error serialising a chart document
    #[error("failed to serialise chart document")]
    Serialisation(#[from] serde_json::Error),
}

impl IntoResponse for PipelineError {
    /// Convert from a `PipelineError` into an [axum::response::Response].
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

/// Body of error response
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorBody {
    /// Main error message
    message: String,

    /// Optional list of causes
    #[serde(skip_serializing_if = "Option::is_none")]
    caused_by: Option<Vec<String>>,
}

impl ErrorBody {
    /// Return a new ErrorBody
    ///
    /// # Arguments
    ///
    /// * `error`: The error that occurred
    fn new<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        let message = error.to_string();
        let mut caused_by = None;
        let mut current = error.source();
        while let Some(source) = current {
            let mut causes: Vec<String> = caused_by.unwrap_or_default();
            causes.push(source.to_string());
            caused_by = Some(causes);
            current = source.source();
        }
        // Remove duplicate entries.
        if let Some(caused_by) = caused_by.as_mut() {
            caused_by.dedup()
        }
        ErrorBody { message, caused_by }
    }
}

/// A response to send in error cases
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorResponse {
    /// HTTP status of the response
    #[serde(skip)]
    status: StatusCode,

    /// Response body
    error: ErrorBody,
}

impl ErrorResponse {
    /// Return a new ErrorResponse
    ///
    /// # Arguments
    ///
    /// * `status`: HTTP status of the response
    /// * `error`: The error that occurred. This will be formatted into a suitable `ErrorBody`
    fn new<E>(status: StatusCode, error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        ErrorResponse {
            status,
            error: ErrorBody::new(error),
        }
    }

    /// Return a 404 not found ErrorResponse
    fn not_found<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    /// Return a 422 unprocessable entity ErrorResponse
    fn unprocessable_entity<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, error)
    }

    /// Return a 500 internal server error ErrorResponse
    fn internal_server_error<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<PipelineError> for ErrorResponse {
    /// Convert from a `PipelineError` into an `ErrorResponse`.
    fn from(error: PipelineError) -> Self {
        let response = match &error {
            // Not found
            PipelineError::NotFound { path: _ } => Self::not_found(&error),

            // Unprocessable entity
            PipelineError::DegenerateRange {
                column: _,
                value: _,
            } => Self::unprocessable_entity(&error),

            // Internal server error. Load-time errors normally stop the process before it
            // serves anything.
            PipelineError::Io { path: _, source: _ }
            | PipelineError::Csv(_)
            | PipelineError::MissingColumn { column: _ }
            | PipelineError::InvalidValue {
                line: _,
                column: _,
                kind: _,
                value: _,
            }
            | PipelineError::AmbiguousDecimalMark(_)
            | PipelineError::Format { value: _ }
            | PipelineError::Conflict {
                from: _,
                to: _,
                year: _,
            }
            | PipelineError::Serialisation(_) => Self::internal_server_error(&error),
        };

        // Log server errors.
        if response.status.is_server_error() {
            event!(Level::ERROR, "{}", error.to_string());
            let mut current = error.source();
            while let Some(source) = current {
                event!(Level::ERROR, "Caused by: {}", source.to_string());
                current = source.source();
            }
        }

        response
    }
}

impl IntoResponse for ErrorResponse {
    /// Convert from an `ErrorResponse` into an `axum::response::Response`.
    ///
    /// Renders the response as JSON.
    fn into_response(self) -> Response {
        let json_body = serde_json::to_string_pretty(&self);
        match json_body {
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialise error response: {}", err),
            )
                .into_response(),
            Ok(json_body) => (
                self.status,
                [(&header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
                json_body,
            )
                .into_response(),
        }
    }
}
