//! Narrowing schemas with a mask
//!
//! Unlike [`MaskNode::apply`](crate::core::MaskNode::apply), narrowing never
//! fails and never reports unknown fields: a field the schema does not
//! declare is simply not dumped. The source schema is left untouched.

use indexmap::IndexMap;

use super::{FieldDescriptor, Schema};
use crate::core::{MaskEntry, MaskNode};

/// Keep only the fields named by both the registry and the mask
///
/// Fields come out in mask order. A nested mask entry narrows the nested
/// descriptor's own schema, or is attached to a raw descriptor for dump-time
/// filtering. Plain value fields ignore nested entries.
pub fn mask_fields(
    fields: &IndexMap<String, FieldDescriptor>,
    mask: &MaskNode,
) -> IndexMap<String, FieldDescriptor> {
    let mut narrowed = IndexMap::new();

    for (name, entry) in mask {
        let Some(descriptor) = fields.get(name) else {
            continue;
        };
        let descriptor = match (entry, descriptor) {
            (MaskEntry::Nested(nested), FieldDescriptor::Nested { .. })
            | (MaskEntry::Nested(nested), FieldDescriptor::Polymorph { .. }) => {
                descriptor.clone_with_mask(nested)
            }
            (
                MaskEntry::Nested(nested),
                FieldDescriptor::Raw {
                    default, attribute, ..
                },
            ) => FieldDescriptor::Raw {
                default: default.clone(),
                attribute: attribute.clone(),
                mask: Some(nested.clone()),
            },
            _ => descriptor.clone(),
        };
        narrowed.insert(name.to_string(), descriptor);
    }

    narrowed
}

/// Copy of `schema` that only dumps the masked fields
pub fn mask_schema(schema: &Schema, mask: &MaskNode) -> Schema {
    let fields = mask_fields(schema.fields(), mask);
    tracing::debug!(
        schema = schema.name(),
        mask = %mask,
        kept = fields.len(),
        declared = schema.len(),
        "Narrowed schema with field mask"
    );
    schema.with_fields(fields)
}
