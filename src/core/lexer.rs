//! Mask tokenizer
//!
//! A single regex pass splits the cleaned mask into brackets, commas and field
//! names. Anything else (whitespace, slashes, quotes...) is dropped on the floor
//! rather than rejected; only the parser decides what is structurally invalid.

use regex::Regex;
use std::sync::OnceLock;

use super::error::ParseError;

/// A lexical token of the mask language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `{`
    Open,
    /// `}`
    Close,
    /// `,`
    Comma,
    /// A field name matching `[\w_:\-*]+`
    Field(&'a str),
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Open => write!(f, "{{"),
            Token::Close => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Field(name) => write!(f, "{}", name),
        }
    }
}

fn lexer() -> &'static Regex {
    static LEXER: OnceLock<Regex> = OnceLock::new();
    LEXER.get_or_init(|| Regex::new(r"\{|\}|,|[\w:\-*]+").unwrap())
}

fn field_name() -> &'static Regex {
    static FIELD_NAME: OnceLock<Regex> = OnceLock::new();
    FIELD_NAME.get_or_init(|| Regex::new(r"^[\w:\-*]+$").unwrap())
}

/// Whether `name` lexes as exactly one field name token
pub fn is_field_name(name: &str) -> bool {
    field_name().is_match(name)
}

/// Strip newlines, surrounding whitespace and the optional outer brackets
///
/// Returns an empty string when nothing is left to tokenize.
pub fn clean(mask: &str) -> Result<String, ParseError> {
    let mask = mask.replace('\n', "");
    let mask = mask.trim();

    if let Some(inner) = mask.strip_prefix('{') {
        return match inner.strip_suffix('}') {
            Some(inner) => Ok(inner.to_string()),
            None => Err(ParseError::MissingClosingBracket),
        };
    }

    Ok(mask.to_string())
}

/// Split a cleaned mask into tokens, discarding unrecognized characters
pub fn tokenize(mask: &str) -> impl Iterator<Item = Token<'_>> {
    lexer().find_iter(mask).map(|m| match m.as_str() {
        "{" => Token::Open,
        "}" => Token::Close,
        "," => Token::Comma,
        name => Token::Field(name),
    })
}
