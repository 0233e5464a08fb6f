//! Applying masks to data
//!
//! Data reaches a mask in two shapes. Materialized values (lists, objects,
//! typed records) are filtered after the fact. Schema field descriptors are
//! filtered before anything is produced, by narrowing what they will emit.
//! [`Target`] names every shape a mask can be applied to and
//! [`MaskNode::apply_target`] dispatches on it.

use serde::Serialize;
use serde_json::{Map, Value};

use super::error::MaskError;
use super::mask::{MaskEntry, MaskNode, WILDCARD};
use crate::schema::FieldDescriptor;

/// Something a mask can be applied to
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// A list of items, each masked independently
    Sequence(Vec<Target>),
    /// A schema field descriptor, narrowed rather than filtered
    Descriptor(FieldDescriptor),
    /// A record that is not a mapping yet; its attributes are filtered
    Object(Value),
    /// A key/value mapping, filtered field by field
    Mapping(Map<String, Value>),
}

impl Target {
    /// Wrap a typed record through its serialized attributes
    pub fn from_object<T: Serialize + ?Sized>(object: &T) -> Result<Self, MaskError> {
        Ok(Target::Object(serde_json::to_value(object)?))
    }

    /// Turn a masked target back into plain JSON
    ///
    /// Returns `None` when a descriptor is involved, since descriptors have no
    /// value until a schema dumps them.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Target::Sequence(items) => items
                .into_iter()
                .map(Target::into_value)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            Target::Descriptor(_) => None,
            Target::Object(value) => Some(value),
            Target::Mapping(map) => Some(Value::Object(map)),
        }
    }
}

impl From<Value> for Target {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Target::Sequence(items.into_iter().map(Target::from).collect()),
            Value::Object(map) => Target::Mapping(map),
            other => Target::Object(other),
        }
    }
}

impl From<FieldDescriptor> for Target {
    fn from(descriptor: FieldDescriptor) -> Self {
        Target::Descriptor(descriptor)
    }
}

impl MaskNode {
    /// Apply the mask to any supported shape
    ///
    /// Sequences come out as sequences, descriptors as narrowed descriptors,
    /// and objects or mappings as filtered mappings.
    pub fn apply_target(&self, target: Target) -> Result<Target, MaskError> {
        match target {
            Target::Sequence(items) => items
                .into_iter()
                .map(|item| self.apply_target(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Target::Sequence),
            Target::Descriptor(descriptor) => descriptor.apply_mask(self).map(Target::Descriptor),
            Target::Object(Value::Object(map)) | Target::Mapping(map) => {
                self.filter_data(&map).map(Target::Mapping)
            }
            Target::Object(Value::Array(items)) => {
                self.apply_target(Target::Sequence(items.into_iter().map(Target::from).collect()))
            }
            Target::Object(_) => Err(MaskError::inconsistent()),
        }
    }

    /// Apply the mask to a JSON value
    ///
    /// Arrays are masked item by item and objects are filtered. Any other
    /// value has no fields to select and is rejected.
    pub fn apply(&self, data: &Value) -> Result<Value, MaskError> {
        match data {
            Value::Array(items) => items
                .iter()
                .map(|item| self.apply(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => self.filter_data(map).map(Value::Object),
            _ => Err(MaskError::inconsistent()),
        }
    }

    /// Apply the mask to a typed record (or a collection of them)
    pub fn apply_to<T: Serialize + ?Sized>(&self, record: &T) -> Result<Value, MaskError> {
        self.apply(&serde_json::to_value(record)?)
    }

    /// Filter a single mapping
    ///
    /// Named fields come out in mask order, followed by the wildcard
    /// pass-through fields in source order.
    pub fn filter_data(&self, data: &Map<String, Value>) -> Result<Map<String, Value>, MaskError> {
        let mut out = Map::new();

        for (field, entry) in self.iter() {
            if field == WILDCARD {
                continue;
            }
            match entry {
                MaskEntry::Nested(nested) => match data.get(field) {
                    None | Some(Value::Null) => {
                        if !self.skip() {
                            out.insert(field.to_string(), Value::Null);
                        }
                    }
                    Some(value) => {
                        let filtered = nested.apply(value).map_err(|e| {
                            tracing::debug!(field, error = %e, "Failed to mask nested field");
                            e.at_field(field)
                        })?;
                        out.insert(field.to_string(), filtered);
                    }
                },
                MaskEntry::Selected => {
                    if self.skip() && !data.contains_key(field) {
                        continue;
                    }
                    let value = data.get(field).cloned().unwrap_or(Value::Null);
                    out.insert(field.to_string(), value);
                }
            }
        }

        if self.has_wildcard() {
            for (key, value) in data {
                if !out.contains_key(key) {
                    out.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(out)
    }
}
