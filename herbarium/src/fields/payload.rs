//! Outbound payload assembly.
//!
//! Flat fields append straight into the multipart payload. Specification
//! fields share one JSON object stored under [`SPECIFICATION_KEY`]; every
//! field owns a distinct key in it, so assembly order does not matter.

use serde_json::{Map, Value as JsonValue};

use super::{Field, FieldTarget, FieldValue};
use crate::errors::{HerbariumError, Result};
use crate::form::{FormData, FormValue};

/// Payload key holding the JSON-encoded specification object.
pub const SPECIFICATION_KEY: &str = "specification";

/// Collects specification values before they are encoded once.
#[derive(Debug, Clone, Default)]
pub struct SpecificationAccumulator {
    entries: Map<String, JsonValue>,
}

impl SpecificationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parsed specification field. Later writes to the same key win.
    pub fn stage(&mut self, field: &Field) -> Result<()> {
        let value = field.value().ok_or(HerbariumError::Unparsed { field: field.id() })?;
        self.entries.insert(field.output_name().to_string(), value.to_json());
        Ok(())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge the staged values into `payload` as one specification entry.
    pub fn flush_into(self, payload: &mut FormData) -> Result<()> {
        if self.entries.is_empty() {
            return Ok(());
        }
        let mut spec = staged_specification(payload)?;
        spec.extend(self.entries);
        replace_specification(payload, &spec)
    }
}

/// Serialize `fields` into a fresh multipart payload.
///
/// Flat fields are appended in order; specification fields are accumulated
/// and written once, after the flat fields.
pub fn serialize_fields(fields: &[Field]) -> Result<FormData> {
    let mut payload = FormData::new();
    let mut spec = SpecificationAccumulator::new();
    for field in fields {
        match field.target() {
            FieldTarget::Flat => field.to_form_data(&mut payload)?,
            FieldTarget::Specification => spec.stage(field)?,
        }
    }
    spec.flush_into(&mut payload)?;
    log::debug!("serialized {} fields into {} payload entries", fields.len(), payload.len());
    Ok(payload)
}

/// Read-modify-write of a single specification key.
pub(crate) fn merge_specification(payload: &mut FormData, output_name: &str, value: &FieldValue) -> Result<()> {
    let mut spec = staged_specification(payload)?;
    spec.insert(output_name.to_string(), value.to_json());
    replace_specification(payload, &spec)
}

fn staged_specification(payload: &FormData) -> Result<Map<String, JsonValue>> {
    match payload.get(SPECIFICATION_KEY) {
        None => Ok(Map::new()),
        Some(FormValue::Text(raw)) if raw.is_empty() => Ok(Map::new()),
        Some(FormValue::Text(raw)) => {
            serde_json::from_str(raw).map_err(|err| HerbariumError::MalformedSpecification {
                message: err.to_string(),
            })
        }
        Some(FormValue::File(_)) => Err(HerbariumError::MalformedSpecification {
            message: "specification entry is a file".to_string(),
        }),
    }
}

fn replace_specification(payload: &mut FormData, spec: &Map<String, JsonValue>) -> Result<()> {
    let encoded = serde_json::to_string(spec)?;
    payload.delete(SPECIFICATION_KEY);
    payload.append(SPECIFICATION_KEY, encoded);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldDecl, ValueKind};

    const NAME: FieldDecl = FieldDecl::flat("name", "name", ValueKind::String);
    const HEIGHT: FieldDecl = FieldDecl::specification("height", "height_m", ValueKind::Float);
    const DIAMETER: FieldDecl = FieldDecl::specification("diameter", "diameter_m", ValueKind::Float);

    fn parsed(decl: FieldDecl, form: &FormData) -> Field {
        let mut field = Field::new(decl);
        assert!(field.parse(form));
        field
    }

    fn spec_json(payload: &FormData) -> JsonValue {
        let raw = payload.get(SPECIFICATION_KEY).and_then(FormValue::as_text).unwrap();
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn specification_merge_is_order_independent() {
        let form = FormData::from_pairs([("height", "12.5"), ("diameter", "3")]);
        let height = parsed(HEIGHT, &form);
        let diameter = parsed(DIAMETER, &form);

        let mut forward = FormData::new();
        height.to_form_data(&mut forward).unwrap();
        diameter.to_form_data(&mut forward).unwrap();

        let mut backward = FormData::new();
        diameter.to_form_data(&mut backward).unwrap();
        height.to_form_data(&mut backward).unwrap();

        assert_eq!(forward.get_all(SPECIFICATION_KEY).count(), 1);
        assert_eq!(spec_json(&forward), spec_json(&backward));
        assert_eq!(spec_json(&forward), serde_json::json!({"height_m": 12.5, "diameter_m": 3}));
    }

    #[test]
    fn integral_floats_encode_without_fraction() {
        let field = parsed(DIAMETER, &FormData::from_pairs([("diameter", "3.0")]));
        let payload = serialize_fields(&[field]).unwrap();
        assert_eq!(payload.get(SPECIFICATION_KEY), Some(&FormValue::from(r#"{"diameter_m":3}"#)));
    }

    #[test]
    fn accumulator_matches_incremental_merge() {
        let form = FormData::from_pairs([("name", "Oak"), ("height", "12.5"), ("diameter", "3")]);
        let fields = vec![parsed(NAME, &form), parsed(HEIGHT, &form), parsed(DIAMETER, &form)];

        let batched = serialize_fields(&fields).unwrap();
        let mut incremental = FormData::new();
        for field in &fields {
            field.to_form_data(&mut incremental).unwrap();
        }

        assert_eq!(batched.get("name"), incremental.get("name"));
        assert_eq!(spec_json(&batched), spec_json(&incremental));
        let keys: Vec<&str> = batched.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", SPECIFICATION_KEY]);
    }

    #[test]
    fn nan_coerces_to_null_in_specification() {
        let field = parsed(HEIGHT, &FormData::from_pairs([("height", "unknown")]));
        let payload = serialize_fields(&[field]).unwrap();
        assert_eq!(spec_json(&payload), serde_json::json!({"height_m": null}));
    }

    #[test]
    fn non_object_specification_is_rejected() {
        let mut payload = FormData::from_pairs([(SPECIFICATION_KEY, "[1,2]")]);
        let field = parsed(HEIGHT, &FormData::from_pairs([("height", "1")]));
        let err = field.to_form_data(&mut payload).unwrap_err();
        assert!(matches!(err, HerbariumError::MalformedSpecification { .. }));
    }

    #[test]
    fn no_specification_fields_means_no_specification_entry() {
        let field = parsed(NAME, &FormData::from_pairs([("name", "Oak")]));
        let payload = serialize_fields(&[field]).unwrap();
        assert!(!payload.contains(SPECIFICATION_KEY));
    }
}
