pub mod parse;
pub mod plan;
pub mod search;

use clap::ValueEnum;
use herbarium::Domain;
use herbarium::fields::{FieldValue, format_number};
use herbarium::form::{FormData, FormValue};

use crate::theme::ICONS;

/// Entity domain selectable on the command line
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DomainArg {
    Plant,
    Post,
}

impl From<DomainArg> for Domain {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::Plant => Domain::Plant,
            DomainArg::Post => Domain::Post,
        }
    }
}

pub(crate) fn describe_entry(value: &FormValue) -> String {
    match value {
        FormValue::Text(text) => text.clone(),
        FormValue::File(entry) => format!("{} {} ({} bytes)", ICONS.file, entry.file_name, entry.bytes.len()),
    }
}

pub(crate) fn describe_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Float(number) => format_number(*number),
        FieldValue::Int(number) => number.map_or_else(|| "NaN".to_string(), |n| n.to_string()),
        FieldValue::Image(entry) => describe_entry(entry),
        FieldValue::TextList(items) => items.join(", "),
        FieldValue::ImageList(items) => items.iter().map(describe_entry).collect::<Vec<_>>().join(", "),
    }
}

/// `key=value` pairs joined by `separator`, files shown by name.
pub(crate) fn join_form(form: &FormData, separator: &str) -> String {
    form.iter()
        .map(|(key, value)| format!("{key}={}", describe_entry(value)))
        .collect::<Vec<_>>()
        .join(separator)
}

pub(crate) fn compact_form(form: &FormData) -> String {
    join_form(form, "&")
}
