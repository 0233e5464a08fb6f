//! The parsed mask tree

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::error::{MaskError, ParseError};
use super::lexer;
use super::parser;

/// The wildcard field: pass through every data field the mask does not name
pub const WILDCARD: &str = "*";

/// What a mask says about one field
#[derive(Debug, Clone, PartialEq)]
pub enum MaskEntry {
    /// The field is selected as-is
    Selected,
    /// The field is selected and filtered with a nested mask
    Nested(MaskNode),
}

/// A parsed field mask
///
/// An ordered list of field names, each either selected as-is or carrying a
/// nested mask, plus the `skip` policy: when `skip` is set, fields missing
/// from the data are left out of the result instead of being reported as
/// `null`.
///
/// Field names always lex as a single token, so rendering a mask and parsing
/// it back gives an equal tree.
///
/// # Example
///
/// ```rust,ignore
/// let mask = MaskNode::parse("{id,title,author{name}}")?;
/// let filtered = mask.apply(&book)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MaskNode {
    entries: IndexMap<String, MaskEntry>,
    skip: bool,
}

impl MaskNode {
    /// Create an empty mask
    pub fn new(skip: bool) -> Self {
        Self {
            entries: IndexMap::new(),
            skip,
        }
    }

    /// Parse a mask string, reporting missing fields as `null`
    pub fn parse(text: &str) -> Result<Self, MaskError> {
        Self::parse_with_skip(text, false)
    }

    /// Parse a mask string with an explicit `skip` policy
    ///
    /// Every nested group parsed from `text` inherits the same policy.
    pub fn parse_with_skip(text: &str, skip: bool) -> Result<Self, MaskError> {
        match parser::parse(text, skip) {
            Ok(mask) => {
                tracing::debug!(mask = %mask, skip, "Parsed field mask");
                Ok(mask)
            }
            Err(e) => {
                tracing::debug!(input = text, error = %e, "Rejected field mask");
                Err(e.into())
            }
        }
    }

    /// Build a mask from a JSON object whose values are `true` or objects
    ///
    /// `{"id": true, "author": {"name": true}}` is equivalent to the string
    /// mask `{id,author{name}}`.
    pub fn from_value(value: &Value, skip: bool) -> Result<Self, MaskError> {
        match value {
            Value::Object(map) => Self::from_map(map, skip),
            _ => Err(MaskError::InvalidMaskDefinition),
        }
    }

    fn from_map(map: &Map<String, Value>, skip: bool) -> Result<Self, MaskError> {
        let mut mask = Self::new(skip);
        for (field, value) in map {
            let entry = match value {
                Value::Bool(true) => MaskEntry::Selected,
                Value::Object(nested) => MaskEntry::Nested(Self::from_map(nested, skip)?),
                _ => {
                    return Err(MaskError::InvalidMaskValue {
                        field: field.clone(),
                    });
                }
            };
            mask.insert_checked(field, entry)?;
        }
        Ok(mask)
    }

    /// Add a selected field (builder style)
    pub fn select(mut self, field: impl AsRef<str>) -> Result<Self, MaskError> {
        self.insert_checked(field.as_ref(), MaskEntry::Selected)?;
        Ok(self)
    }

    /// Add a field filtered by a nested mask (builder style)
    pub fn nest(mut self, field: impl AsRef<str>, mask: MaskNode) -> Result<Self, MaskError> {
        self.insert_checked(field.as_ref(), MaskEntry::Nested(mask))?;
        Ok(self)
    }

    fn insert_checked(&mut self, field: &str, entry: MaskEntry) -> Result<(), MaskError> {
        if !lexer::is_field_name(field) {
            return Err(MaskError::InvalidFieldName {
                field: field.to_string(),
            });
        }
        self.insert(field, entry);
        Ok(())
    }

    /// Set or replace a field, keeping its original position if present
    ///
    /// `field` must already be a valid field name.
    pub(crate) fn insert(&mut self, field: &str, entry: MaskEntry) {
        self.entries.insert(field.to_string(), entry);
    }

    /// Whether missing fields are omitted rather than reported as `null`
    pub fn skip(&self) -> bool {
        self.skip
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry for a field
    pub fn get(&self, field: &str) -> Option<&MaskEntry> {
        self.entries.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    /// Whether the mask passes through fields it does not name
    pub fn has_wildcard(&self) -> bool {
        self.contains(WILDCARD)
    }

    /// Iterate over fields in definition order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MaskEntry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Field names in definition order
    pub fn field_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

/// Equal when both masks name the same fields in the same order
impl PartialEq for MaskNode {
    fn eq(&self, other: &Self) -> bool {
        self.skip == other.skip && self.entries.iter().eq(other.entries.iter())
    }
}

impl<'a> IntoIterator for &'a MaskNode {
    type Item = (&'a str, &'a MaskEntry);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a MaskEntry)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Renders the canonical bracketed form, e.g. `{id,author{name}}`
impl fmt::Display for MaskNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, entry)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match entry {
                MaskEntry::Selected => write!(f, "{}", name)?,
                MaskEntry::Nested(nested) => write!(f, "{}{}", name, nested)?,
            }
        }
        write!(f, "}}")
    }
}

impl FromStr for MaskNode {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&[u8]> for MaskNode {
    type Error = MaskError;

    /// Parse raw header bytes, which must be UTF-8
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let text = std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidEncoding)?;
        Self::parse(text)
    }
}
