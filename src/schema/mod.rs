//! Schemas: named registries of field descriptors
//!
//! A [`Schema`] decides which fields of a record get serialized and how.
//! Narrowing a schema with a mask ([`mask_schema`]) happens before dumping,
//! so fields nobody asked for are never produced at all.
//!
//! # Example
//!
//! ```rust,ignore
//! let user = Schema::new("user")
//!     .field("id", FieldDescriptor::scalar())
//!     .field("username", FieldDescriptor::scalar());
//! let book = Schema::new("book")
//!     .field("id", FieldDescriptor::scalar())
//!     .field("title", FieldDescriptor::scalar())
//!     .field("created_by", FieldDescriptor::nested(user));
//!
//! let mask = MaskNode::parse("{title,created_by{username}}")?;
//! let body = mask_schema(&book, &mask).dump(&record)?;
//! ```

pub mod field;
pub mod narrow;

pub use field::FieldDescriptor;
pub use narrow::{mask_fields, mask_schema};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::MaskError;

/// Field registry of a serializer, in output order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    name: String,
    fields: IndexMap<String, FieldDescriptor>,
}

impl Schema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field (builder style)
    pub fn field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(name.into(), descriptor);
        self
    }

    /// Copy of this schema with another field registry
    pub fn with_fields(&self, fields: IndexMap<String, FieldDescriptor>) -> Self {
        Self {
            name: self.name.clone(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &IndexMap<String, FieldDescriptor> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize one record through the schema
    ///
    /// Fields come out in schema order. A field missing from the record is
    /// dumped as its raw default, or `null`.
    pub fn dump(&self, record: &Value) -> Result<Value, MaskError> {
        let Value::Object(record) = record else {
            return Err(MaskError::inconsistent());
        };

        let mut out = Map::new();
        for (name, descriptor) in &self.fields {
            let value = record.get(descriptor.source_key(name));
            let dumped = dump_field(descriptor, value).map_err(|e| e.at_field(name))?;
            out.insert(name.clone(), dumped);
        }
        Ok(Value::Object(out))
    }

    /// Serialize a list of records
    pub fn dump_many(&self, records: &[Value]) -> Result<Value, MaskError> {
        records
            .iter()
            .map(|record| self.dump(record))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    /// Serialize a typed record, or a collection of them
    pub fn dump_object<T: Serialize + ?Sized>(&self, record: &T) -> Result<Value, MaskError> {
        match serde_json::to_value(record)? {
            Value::Array(records) => self.dump_many(&records),
            record => self.dump(&record),
        }
    }
}

fn dump_field(descriptor: &FieldDescriptor, value: Option<&Value>) -> Result<Value, MaskError> {
    let value = value.filter(|v| !v.is_null());

    match descriptor {
        FieldDescriptor::Scalar { .. } => Ok(value.cloned().unwrap_or(Value::Null)),
        FieldDescriptor::Raw { default, mask, .. } => {
            let value = value.or(default.as_ref()).cloned().unwrap_or(Value::Null);
            match mask {
                Some(mask) if !value.is_null() => mask.apply(&value),
                _ => Ok(value),
            }
        }
        FieldDescriptor::Nested { schema, many } => match value {
            None => Ok(Value::Null),
            Some(Value::Array(records)) if *many => schema.dump_many(records),
            Some(_) if *many => Err(MaskError::inconsistent()),
            Some(record) => schema.dump(record),
        },
        FieldDescriptor::Polymorph {
            discriminator,
            variants,
        } => {
            let Some(record) = value else {
                return Ok(Value::Null);
            };
            let schema = record
                .get(discriminator)
                .and_then(Value::as_str)
                .and_then(|kind| variants.get(kind))
                .ok_or_else(MaskError::inconsistent)?;
            schema.dump(record)
        }
    }
}
