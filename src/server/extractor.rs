//! Axum extractor for field masks
//!
//! Reads the mask header (`x-fields` unless a [`MaskConfig`] is found in the
//! request extensions) and parses it before the handler runs. A malformed
//! mask rejects the request with `400 Bad Request`.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use serde::Serialize;
use serde_json::Value;

use crate::config::MaskConfig;
use crate::core::{MaskError, MaskNode, ParseError};
use crate::schema::{Schema, mask_schema};

/// The field mask sent with a request, if any
///
/// # Usage
///
/// ```rust,ignore
/// async fn get_book(mask: FieldMask) -> Result<Json<Value>, MaskError> {
///     let book = load_book();
///     Ok(Json(mask.dump(&book_schema(), &book)?))
/// }
///
/// let app = Router::new()
///     .route("/books/{id}", get(get_book))
///     .layer(Extension(MaskConfig { header: "x-mask".into(), skip: false }));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMask(pub Option<MaskNode>);

impl FieldMask {
    /// Parse the configured mask header out of a header map
    pub fn from_headers(headers: &HeaderMap, config: &MaskConfig) -> Result<Self, MaskError> {
        let Some(value) = headers.get(config.header.as_str()) else {
            return Ok(Self(None));
        };
        let text = std::str::from_utf8(value.as_bytes()).map_err(|_| {
            tracing::debug!(header = %config.header, "Mask header is not valid UTF-8");
            ParseError::InvalidEncoding
        })?;
        config.parse_mask(Some(text)).map(Self)
    }

    /// The parsed mask, or `None` when the request sent none
    pub fn mask(&self) -> Option<&MaskNode> {
        self.0.as_ref()
    }

    /// Filter a JSON value, passing it through untouched without a mask
    pub fn apply(&self, data: Value) -> Result<Value, MaskError> {
        match &self.0 {
            Some(mask) => mask.apply(&data),
            None => Ok(data),
        }
    }

    /// Filter a typed record, passing every field through without a mask
    pub fn apply_to<T: Serialize + ?Sized>(&self, record: &T) -> Result<Value, MaskError> {
        match &self.0 {
            Some(mask) => mask.apply_to(record),
            None => Ok(serde_json::to_value(record)?),
        }
    }

    /// The schema to dump with: narrowed by the mask, or a plain copy
    pub fn narrow(&self, schema: &Schema) -> Schema {
        match &self.0 {
            Some(mask) => mask_schema(schema, mask),
            None => schema.clone(),
        }
    }

    /// Dump a record (or a list of records) through the narrowed schema
    pub fn dump(&self, schema: &Schema, data: &Value) -> Result<Value, MaskError> {
        let schema = self.narrow(schema);
        match data {
            Value::Array(records) => schema.dump_many(records),
            record => schema.dump(record),
        }
    }
}

impl From<MaskNode> for FieldMask {
    fn from(mask: MaskNode) -> Self {
        Self(Some(mask))
    }
}

impl<S> FromRequestParts<S> for FieldMask
where
    S: Send + Sync,
{
    type Rejection = MaskError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let config = parts
            .extensions
            .get::<MaskConfig>()
            .cloned()
            .unwrap_or_default();
        Self::from_headers(&parts.headers, &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn headers(name: &'static str, value: HeaderValue) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, value);
        headers
    }

    #[test]
    fn test_no_header_means_no_mask() {
        let mask = FieldMask::from_headers(&HeaderMap::new(), &MaskConfig::default()).unwrap();
        assert_eq!(mask, FieldMask(None));
        assert_eq!(mask.apply(json!({"a": 1})).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_header_is_parsed() {
        let map = headers("x-fields", HeaderValue::from_static("{id}"));
        let mask = FieldMask::from_headers(&map, &MaskConfig::default()).unwrap();
        assert_eq!(
            mask.apply(json!({"id": 1, "title": "X"})).unwrap(),
            json!({"id": 1})
        );
    }

    #[test]
    fn test_custom_header_and_skip() {
        let config = MaskConfig {
            header: "x-mask".to_string(),
            skip: true,
        };
        let map = headers("x-mask", HeaderValue::from_static("{id,title}"));
        let mask = FieldMask::from_headers(&map, &config).unwrap();
        assert_eq!(mask.apply(json!({"id": 1})).unwrap(), json!({"id": 1}));

        let map = headers("x-fields", HeaderValue::from_static("{id}"));
        assert_eq!(FieldMask::from_headers(&map, &config).unwrap(), FieldMask(None));
    }

    #[test]
    fn test_invalid_header() {
        let map = headers("x-fields", HeaderValue::from_static("a,,b"));
        assert_eq!(
            FieldMask::from_headers(&map, &MaskConfig::default()),
            Err(MaskError::Parse(ParseError::UnexpectedComma))
        );

        let map = headers("x-fields", HeaderValue::from_bytes(&[0xff]).unwrap());
        assert_eq!(
            FieldMask::from_headers(&map, &MaskConfig::default()),
            Err(MaskError::Parse(ParseError::InvalidEncoding))
        );
    }

    #[test]
    fn test_apply_to_typed_record() {
        #[derive(Serialize)]
        struct Book {
            id: u32,
            title: String,
            isbn: Option<String>,
        }

        let book = Book {
            id: 2,
            title: "The Shining".to_string(),
            isbn: None,
        };

        assert_eq!(
            FieldMask(None).apply_to(&book).unwrap(),
            json!({"id": 2, "title": "The Shining", "isbn": null})
        );

        let map = headers("x-fields", HeaderValue::from_static("{title,isbn}"));
        let mask = FieldMask::from_headers(&map, &MaskConfig::default()).unwrap();
        assert_eq!(
            mask.apply_to(&book).unwrap(),
            json!({"title": "The Shining", "isbn": null})
        );

        let mask = FieldMask::from(MaskNode::parse("{title{x}}").unwrap());
        assert_eq!(
            mask.apply_to(&book),
            Err(MaskError::inconsistent_field("title"))
        );
    }

    #[test]
    fn test_narrow_without_mask_is_a_copy() {
        let schema = Schema::new("user").field("id", crate::schema::FieldDescriptor::scalar());
        assert_eq!(FieldMask(None).narrow(&schema), schema);
    }
}
