//! Core module: the mask language, its parser and the filtering algorithm

pub mod apply;
pub mod error;
pub mod lexer;
pub mod mask;
pub mod parser;

pub use apply::Target;
pub use error::{ErrorResponse, MaskError, ParseError};
pub use mask::{MaskEntry, MaskNode, WILDCARD};
