//! # This-Mask
//!
//! Field masks for REST APIs: let clients pick which fields of a response
//! they want with a compact expression, usually sent in the `X-Fields` header.
//!
//! ## Features
//!
//! - **Mask Language**: `{id,title,author{name},created_by{username}}`, with
//!   optional outer brackets and a `*` wildcard
//! - **Strict Structure, Lenient Text**: stray brackets and commas are errors,
//!   any other punctuation is ignored
//! - **Post-hoc Filtering**: apply a mask to JSON values, lists and typed records
//! - **Schema Narrowing**: restrict a serializer schema before dumping, so
//!   unrequested fields are never produced
//! - **Skip Mode**: omit missing fields instead of reporting them as `null`
//! - **Axum Integration**: `FieldMask` extractor and `400 Bad Request` errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use this_mask::prelude::*;
//!
//! let mask = MaskNode::parse("{id,title,author{name}}")?;
//!
//! let book = json!({
//!     "id": 1,
//!     "title": "Carrie",
//!     "author": {"name": "Stephen King", "born": 1947},
//! });
//!
//! assert_eq!(
//!     mask.apply(&book)?,
//!     json!({"id": 1, "title": "Carrie", "author": {"name": "Stephen King"}})
//! );
//! ```

pub mod config;
pub mod core;
pub mod schema;
pub mod server;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Masks ===
    pub use crate::core::{
        ErrorResponse, MaskEntry, MaskError, MaskNode, ParseError, Target, WILDCARD,
    };

    // === Schemas ===
    pub use crate::schema::{FieldDescriptor, Schema, mask_fields, mask_schema};

    // === Config ===
    pub use crate::config::{DEFAULT_MASK_HEADER, MaskConfig};

    // === Server ===
    pub use crate::server::FieldMask;

    // === External dependencies ===
    pub use serde_json::{Value, json};
}
