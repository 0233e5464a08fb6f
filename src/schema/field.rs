//! Field descriptors
//!
//! A descriptor says how one field of a record is serialized. Descriptors
//! that point at another schema can be narrowed by a mask before any value
//! is produced.

use indexmap::IndexMap;
use serde_json::Value;

use super::Schema;
use super::narrow::mask_schema;
use crate::core::{MaskError, MaskNode};

/// How a single field is serialized
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDescriptor {
    /// A plain value copied from the record
    ///
    /// It has no inner shape, so it cannot take a nested mask.
    Scalar {
        /// Source key, when it differs from the field name
        attribute: Option<String>,
    },

    /// An unstructured value, optionally filtered by a mask when dumped
    Raw {
        /// Value used when the record has no such key
        default: Option<Value>,
        /// Source key, when it differs from the field name
        attribute: Option<String>,
        /// Mask applied to the value at dump time
        mask: Option<MaskNode>,
    },

    /// A relationship serialized through another schema
    Nested {
        schema: Schema,
        /// Whether the value is a list of records
        many: bool,
    },

    /// A record whose schema is picked by the value of a discriminator key
    Polymorph {
        discriminator: String,
        variants: IndexMap<String, Schema>,
    },
}

impl FieldDescriptor {
    /// A plain value field
    pub fn scalar() -> Self {
        FieldDescriptor::Scalar { attribute: None }
    }

    /// An unstructured field with no default and no mask
    pub fn raw() -> Self {
        FieldDescriptor::Raw {
            default: None,
            attribute: None,
            mask: None,
        }
    }

    /// A single nested record
    pub fn nested(schema: Schema) -> Self {
        FieldDescriptor::Nested {
            schema,
            many: false,
        }
    }

    /// A list of nested records
    pub fn list(schema: Schema) -> Self {
        FieldDescriptor::Nested { schema, many: true }
    }

    /// A record dispatched on `discriminator`
    pub fn polymorph(
        discriminator: impl Into<String>,
        variants: impl IntoIterator<Item = (String, Schema)>,
    ) -> Self {
        FieldDescriptor::Polymorph {
            discriminator: discriminator.into(),
            variants: variants.into_iter().collect(),
        }
    }

    /// Read the field from another source key
    ///
    /// Only plain and raw fields read directly from the record; other
    /// descriptors are returned unchanged.
    pub fn with_attribute(self, attribute: impl Into<String>) -> Self {
        match self {
            FieldDescriptor::Scalar { .. } => FieldDescriptor::Scalar {
                attribute: Some(attribute.into()),
            },
            FieldDescriptor::Raw { default, mask, .. } => FieldDescriptor::Raw {
                default,
                attribute: Some(attribute.into()),
                mask,
            },
            other => other,
        }
    }

    /// Use `default` when the record lacks the field (raw fields only)
    pub fn with_default(self, default: Value) -> Self {
        match self {
            FieldDescriptor::Raw {
                attribute, mask, ..
            } => FieldDescriptor::Raw {
                default: Some(default),
                attribute,
                mask,
            },
            other => other,
        }
    }

    /// Copy of a nested descriptor whose schema(s) only keep masked fields
    ///
    /// Plain and raw descriptors are returned unchanged.
    pub fn clone_with_mask(&self, mask: &MaskNode) -> Self {
        match self {
            FieldDescriptor::Nested { schema, many } => FieldDescriptor::Nested {
                schema: mask_schema(schema, mask),
                many: *many,
            },
            FieldDescriptor::Polymorph {
                discriminator,
                variants,
            } => FieldDescriptor::Polymorph {
                discriminator: discriminator.clone(),
                variants: variants
                    .iter()
                    .map(|(name, schema)| (name.clone(), mask_schema(schema, mask)))
                    .collect(),
            },
            other => other.clone(),
        }
    }

    /// Apply a mask to the descriptor itself
    ///
    /// Nested descriptors are narrowed, raw descriptors carry the mask until
    /// dump time, and plain values cannot be masked at all.
    pub fn apply_mask(&self, mask: &MaskNode) -> Result<Self, MaskError> {
        match self {
            FieldDescriptor::Nested { .. } | FieldDescriptor::Polymorph { .. } => {
                Ok(self.clone_with_mask(mask))
            }
            FieldDescriptor::Raw {
                default, attribute, ..
            } => Ok(FieldDescriptor::Raw {
                default: default.clone(),
                attribute: attribute.clone(),
                mask: Some(mask.clone()),
            }),
            FieldDescriptor::Scalar { .. } => {
                tracing::debug!(mask = %mask, "Cannot mask a plain value field");
                Err(MaskError::inconsistent())
            }
        }
    }

    /// The record key this descriptor reads, given its field name
    pub(crate) fn source_key<'a>(&'a self, field: &'a str) -> &'a str {
        match self {
            FieldDescriptor::Scalar {
                attribute: Some(attribute),
            }
            | FieldDescriptor::Raw {
                attribute: Some(attribute),
                ..
            } => attribute.as_str(),
            _ => field,
        }
    }
}
