//! Typed errors for field masks
//!
//! Two granularities are exposed so callers can match on either:
//!
//! - [`ParseError`]: the mask text itself is syntactically invalid
//! - [`MaskError`]: the mask cannot be applied (this includes
//!   [`MaskError::Parse`], which wraps every [`ParseError`])
//!
//! Every mask error is a client-input error and maps to `400 Bad Request`.
//!
//! # Example
//!
//! ```rust,ignore
//! use this_mask::prelude::*;
//!
//! match MaskNode::parse("{id,author{name}") {
//!     Ok(mask) => println!("mask: {}", mask),
//!     Err(MaskError::Parse(ParseError::MissingClosingBracket)) => {
//!         println!("unbalanced mask");
//!     }
//!     Err(e) => eprintln!("other mask error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Parse Errors
// =============================================================================

/// Syntax errors raised while parsing a mask string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `{` that does not directly follow a field name
    #[error("Unexpected opening bracket")]
    UnexpectedOpeningBracket,

    /// A `}` with no open group to close
    #[error("Unexpected closing bracket")]
    UnexpectedClosingBracket,

    /// A leading comma, or a comma after another comma or a `{`
    #[error("Unexpected comma")]
    UnexpectedComma,

    /// A group left open at the end of input
    #[error("Missing closing bracket")]
    MissingClosingBracket,

    /// The raw mask bytes are not valid UTF-8
    #[error("Mask is not valid UTF-8")]
    InvalidEncoding,
}

impl ParseError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ParseError::UnexpectedOpeningBracket => "MASK_UNEXPECTED_OPENING_BRACKET",
            ParseError::UnexpectedClosingBracket => "MASK_UNEXPECTED_CLOSING_BRACKET",
            ParseError::UnexpectedComma => "MASK_UNEXPECTED_COMMA",
            ParseError::MissingClosingBracket => "MASK_MISSING_CLOSING_BRACKET",
            ParseError::InvalidEncoding => "MASK_INVALID_ENCODING",
        }
    }
}

// =============================================================================
// Mask Errors
// =============================================================================

/// Errors raised when building or applying a mask
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaskError {
    /// The mask text failed to parse
    #[error("Mask parse error: {0}")]
    Parse(#[from] ParseError),

    /// The mask asks for nested fields on something that has none
    #[error("Mask is inconsistent with model")]
    Inconsistent {
        /// Field being filtered when the mismatch was found, if any
        field: Option<String>,
    },

    /// A JSON mask definition holds something other than `true` or an object
    #[error("Invalid mask value for field '{field}': expected true or an object")]
    InvalidMaskValue { field: String },

    /// A JSON mask definition whose root is not an object
    #[error("Mask definition must be a JSON object")]
    InvalidMaskDefinition,

    /// A field name the mask language cannot express
    #[error("Invalid mask field name '{field}'")]
    InvalidFieldName { field: String },

    /// A typed record could not be turned into JSON before masking
    #[error("Failed to serialize value for masking: {0}")]
    Serialization(String),
}

impl MaskError {
    /// Shorthand for an inconsistency not tied to a named field
    pub fn inconsistent() -> Self {
        MaskError::Inconsistent { field: None }
    }

    /// Shorthand for an inconsistency found while filtering `field`
    pub fn inconsistent_field(field: impl Into<String>) -> Self {
        MaskError::Inconsistent {
            field: Some(field.into()),
        }
    }

    /// Attach `field` to an inconsistency that does not name one yet
    ///
    /// The innermost field wins, so nested failures point at the deepest
    /// field that could not be filtered.
    pub fn at_field(self, field: &str) -> Self {
        match self {
            MaskError::Inconsistent { field: None } => MaskError::inconsistent_field(field),
            other => other,
        }
    }

    /// Whether this is a syntax error in the mask text
    pub fn is_parse_error(&self) -> bool {
        matches!(self, MaskError::Parse(_))
    }

    /// Get the HTTP status code for this error
    ///
    /// Masks come from the client, so every failure is a bad request.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            MaskError::Parse(e) => e.error_code(),
            MaskError::Inconsistent { .. } => "MASK_INCONSISTENT",
            MaskError::InvalidMaskValue { .. } => "MASK_INVALID_VALUE",
            MaskError::InvalidMaskDefinition => "MASK_INVALID_DEFINITION",
            MaskError::InvalidFieldName { .. } => "MASK_INVALID_FIELD_NAME",
            MaskError::Serialization(_) => "MASK_SERIALIZATION_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            MaskError::Inconsistent { field: Some(field) }
            | MaskError::InvalidMaskValue { field }
            | MaskError::InvalidFieldName { field } => {
                Some(serde_json::json!({ "field": field }))
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MaskError {
    fn from(err: serde_json::Error) -> Self {
        MaskError::Serialization(err.to_string())
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for MaskError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}
