//! Firestore REST wire format.
//!
//! The REST API wraps every field in a typed value object
//! (`{"stringValue": "..."}`, `{"integerValue": "42"}`, ...), with 64-bit
//! integers encoded as JSON strings. Documents written by different app
//! versions disagree about which wrapper a field uses, so the model is
//! deliberately loose: every wrapper slot is optional, accessors return
//! `Option`, and a value of an unknown kind deserializes to an empty
//! [`FsValue`] instead of failing the whole document.

use std::collections::HashMap;

use serde::Deserialize;

/// A single Firestore value: one of the typed wrapper slots, all optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsValue {
    string_value: Option<String>,
    /// Int64 fields arrive as decimal strings per the REST encoding.
    integer_value: Option<String>,
    double_value: Option<f64>,
    boolean_value: Option<bool>,
    map_value: Option<FsMapValue>,
    array_value: Option<FsArrayValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FsMapValue {
    fields: HashMap<String, FsValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FsArrayValue {
    values: Vec<FsValue>,
}

impl FsValue {
    /// String content, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.string_value.as_deref()
    }

    /// Integer content; parses the REST string encoding.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.integer_value.as_deref().and_then(|raw| raw.parse().ok())
    }

    /// Double content.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.double_value
    }

    /// Boolean content.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.boolean_value
    }

    /// A named field of a map value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        self.map_value.as_ref()?.fields.get(name)
    }

    /// Elements of an array value; empty slice for non-arrays.
    #[must_use]
    pub fn items(&self) -> &[Self] {
        self.array_value
            .as_ref()
            .map_or(&[], |array| array.values.as_slice())
    }
}

/// A Firestore document: resource name plus field map.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FsDocument {
    /// Full resource path
    /// (`projects/{p}/databases/(default)/documents/stores/{id}/...`).
    pub name: String,
    pub fields: HashMap<String, FsValue>,
}

impl FsDocument {
    /// The document identifier: final segment of the resource name.
    #[must_use]
    pub fn doc_id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// A named top-level field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FsValue> {
        self.fields.get(name)
    }

    /// Whether the document carries any recognizable field structure.
    #[must_use]
    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// Response shape of the `listDocuments` endpoint.
///
/// Firestore omits the `documents` key entirely for empty collections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    pub documents: Vec<FsDocument>,
}
