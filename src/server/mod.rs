//! HTTP boundary: reading masks from requests and reporting mask errors

pub mod extractor;

pub use extractor::FieldMask;
