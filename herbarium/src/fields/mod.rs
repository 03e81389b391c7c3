//! Typed form fields.
//!
//! A [`FieldDecl`] is a static declaration: where to read the raw value, which
//! key to write it under, and how to coerce it. A [`Field`] pairs a declaration
//! with the value parsed from one submitted form. Parsing is all-or-nothing: a
//! field either holds a value of its declared kind or nothing at all.

pub mod coerce;
pub mod payload;
pub mod registry;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::errors::{ConfigError, HerbariumError, Result};
use crate::form::{FormData, FormValue};

pub use coerce::{format_number, number_json, parse_float_lenient, parse_int_lenient};
pub use payload::{SPECIFICATION_KEY, SpecificationAccumulator, serialize_fields};
pub use registry::{FieldRegistry, SpecificationScope};

/// Primitive shape a field's value is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueKind {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "string[]")]
    StringList,
    #[serde(rename = "image[]")]
    ImageList,
}

impl ValueKind {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Float => "float",
            ValueKind::Int => "int",
            ValueKind::Image => "image",
            ValueKind::StringList => "string[]",
            ValueKind::ImageList => "image[]",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ValueKind::String),
            "float" => Ok(ValueKind::Float),
            "int" => Ok(ValueKind::Int),
            "image" => Ok(ValueKind::Image),
            "string[]" => Ok(ValueKind::StringList),
            "image[]" => Ok(ValueKind::ImageList),
            other => Err(ConfigError::UnknownValueKind { name: other.to_string() }),
        }
    }
}

/// Where a parsed field lands in the outbound payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldTarget {
    /// Appended under its output name.
    Flat,
    /// Merged into the JSON object stored under [`SPECIFICATION_KEY`].
    Specification,
}

/// Static declaration of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDecl {
    /// Key read from the submitted form.
    pub id: &'static str,
    /// Key written to the outbound payload.
    pub output_name: &'static str,
    pub kind: ValueKind,
    pub target: FieldTarget,
}

impl FieldDecl {
    pub const fn flat(id: &'static str, output_name: &'static str, kind: ValueKind) -> Self {
        Self {
            id,
            output_name,
            kind,
            target: FieldTarget::Flat,
        }
    }

    pub const fn specification(id: &'static str, output_name: &'static str, kind: ValueKind) -> Self {
        Self {
            id,
            output_name,
            kind,
            target: FieldTarget::Specification,
        }
    }
}

/// A coerced field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    /// May be NaN when the input had no numeric prefix.
    Float(f64),
    /// `None` when the input had no integer prefix.
    Int(Option<i64>),
    /// Raw form entry, passed through untouched.
    Image(FormValue),
    TextList(Vec<String>),
    ImageList(Vec<FormValue>),
}

impl FieldValue {
    /// JSON form used inside the specification object. Non-finite numbers become `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            FieldValue::Text(text) => JsonValue::String(text.clone()),
            FieldValue::Float(number) => number_json(*number),
            FieldValue::Int(number) => number.map_or(JsonValue::Null, JsonValue::from),
            FieldValue::Image(entry) => image_json(entry),
            FieldValue::TextList(items) => items.iter().cloned().map(JsonValue::String).collect(),
            FieldValue::ImageList(items) => items.iter().map(image_json).collect(),
        }
    }

    /// Append this value under `key`, one entry per element for list kinds.
    pub fn append_to(&self, key: &str, payload: &mut FormData) {
        match self {
            FieldValue::Text(text) => payload.append(key, text.as_str()),
            FieldValue::Float(number) => payload.append(key, format_number(*number)),
            FieldValue::Int(number) => {
                payload.append(key, number.map_or_else(|| "NaN".to_string(), |n| n.to_string()))
            }
            FieldValue::Image(entry) => payload.append(key, entry.clone()),
            FieldValue::TextList(items) => {
                for item in items {
                    payload.append(key, item.as_str());
                }
            }
            FieldValue::ImageList(items) => {
                for item in items {
                    payload.append(key, item.clone());
                }
            }
        }
    }
}

// Files carry no JSON representation of their own; they encode as an empty object.
fn image_json(entry: &FormValue) -> JsonValue {
    match entry {
        FormValue::Text(text) => JsonValue::String(text.clone()),
        FormValue::File(_) => JsonValue::Object(serde_json::Map::new()),
    }
}

/// One declared field plus the value parsed for it, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    #[serde(flatten)]
    decl: FieldDecl,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<FieldValue>,
}

impl Field {
    pub fn new(decl: FieldDecl) -> Self {
        Self { decl, value: None }
    }

    #[inline]
    pub fn id(&self) -> &'static str {
        self.decl.id
    }

    #[inline]
    pub fn output_name(&self) -> &'static str {
        self.decl.output_name
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.decl.kind
    }

    #[inline]
    pub fn target(&self) -> FieldTarget {
        self.decl.target
    }

    #[inline]
    pub fn value(&self) -> Option<&FieldValue> {
        self.value.as_ref()
    }

    #[inline]
    pub fn is_parsed(&self) -> bool {
        self.value.is_some()
    }

    /// Read this field out of `form`. Returns `false` and leaves the field
    /// unparsed when the input is missing, blank, or an empty list.
    pub fn parse(&mut self, form: &FormData) -> bool {
        let id = self.decl.id;
        let value = match self.decl.kind {
            ValueKind::String => scalar_text(form, id).map(|text| FieldValue::Text(text.to_string())),
            ValueKind::Float => scalar_text(form, id).map(|text| FieldValue::Float(parse_float_lenient(text))),
            ValueKind::Int => scalar_text(form, id).map(|text| FieldValue::Int(parse_int_lenient(text))),
            ValueKind::Image => form
                .get(id)
                .filter(|entry| !entry.is_blank())
                .map(|entry| FieldValue::Image(entry.clone())),
            ValueKind::StringList => {
                let items: Vec<String> = form.get_all_text(id).map(str::to_string).collect();
                (!items.is_empty()).then_some(FieldValue::TextList(items))
            }
            ValueKind::ImageList => {
                let items: Vec<FormValue> = form.get_all(id).cloned().collect();
                (!items.is_empty()).then_some(FieldValue::ImageList(items))
            }
        };

        match value {
            Some(value) => {
                self.value = Some(value);
                true
            }
            None => false,
        }
    }

    /// Append this field's value to `payload` according to its target.
    pub fn to_form_data(&self, payload: &mut FormData) -> Result<()> {
        let value = self.value.as_ref().ok_or(HerbariumError::Unparsed { field: self.decl.id })?;
        match self.decl.target {
            FieldTarget::Flat => {
                value.append_to(self.decl.output_name, payload);
                Ok(())
            }
            FieldTarget::Specification => payload::merge_specification(payload, self.decl.output_name, value),
        }
    }
}

fn scalar_text<'a>(form: &'a FormData, id: &str) -> Option<&'a str> {
    form.get(id).and_then(FormValue::as_text).filter(|text| !text.is_empty())
}
