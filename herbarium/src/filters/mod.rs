//! Search filters and their query-string rendering.
//!
//! Filters are the search-side counterpart of fields: each declaration names
//! the form input it reads and the query parameter it renders. Nothing here
//! URL-encodes; values are assumed free of `=`, `&` and `,`.

pub mod registry;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::ConfigError;
use crate::fields::coerce::serialize_number;
use crate::fields::{format_number, parse_float_lenient};
use crate::form::{FormData, FormValue};

pub use registry::{FilterRegistry, build_query, search_url};

/// Value shape of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterShape {
    /// One string read from `<name>`.
    Text,
    /// Two numbers read from `<name>-min` and `<name>-max`.
    Range,
    /// Every value under `<name>[]`.
    Options,
}

/// Static declaration of one search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterDecl {
    /// Query-string parameter name.
    #[serde(rename = "type")]
    pub query_key: &'static str,
    /// Form input name.
    pub name: &'static str,
    pub shape: FilterShape,
}

impl FilterDecl {
    pub const fn text(query_key: &'static str, name: &'static str) -> Self {
        Self {
            query_key,
            name,
            shape: FilterShape::Text,
        }
    }

    pub const fn range(query_key: &'static str, name: &'static str) -> Self {
        Self {
            query_key,
            name,
            shape: FilterShape::Range,
        }
    }

    pub const fn options(query_key: &'static str, name: &'static str) -> Self {
        Self {
            query_key,
            name,
            shape: FilterShape::Options,
        }
    }
}

/// Parsed filter parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterParams {
    /// Keyed by the filter's form name; must hold exactly one entry to render.
    Text(BTreeMap<String, String>),
    Range {
        #[serde(serialize_with = "serialize_number")]
        min: f64,
        #[serde(serialize_with = "serialize_number")]
        max: f64,
    },
    Options {
        #[serde(rename = "possibleValues")]
        possible_values: Vec<String>,
    },
}

impl FilterParams {
    fn empty(shape: FilterShape) -> Self {
        match shape {
            FilterShape::Text => FilterParams::Text(BTreeMap::new()),
            FilterShape::Range => FilterParams::Range { min: 0.0, max: 0.0 },
            FilterShape::Options => FilterParams::Options {
                possible_values: Vec::new(),
            },
        }
    }
}

/// JSON view of a filter: `{"type": ..., "params": ...}`.
#[derive(Debug, Serialize)]
pub struct FilterJson<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub params: &'a FilterParams,
}

/// One declared filter plus its parsed parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    #[serde(flatten)]
    decl: FilterDecl,
    pub params: FilterParams,
}

impl Filter {
    pub fn new(decl: FilterDecl) -> Self {
        Self {
            decl,
            params: FilterParams::empty(decl.shape),
        }
    }

    #[inline]
    pub fn query_key(&self) -> &'static str {
        self.decl.query_key
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.decl.name
    }

    #[inline]
    pub fn shape(&self) -> FilterShape {
        self.decl.shape
    }

    /// Read this filter out of `form`. A range needs both bounds; options
    /// need at least one value.
    pub fn parse(&mut self, form: &FormData) -> bool {
        let name = self.decl.name;
        match self.decl.shape {
            FilterShape::Text => {
                let Some(value) = text_value(form, name) else {
                    return false;
                };
                let mut params = BTreeMap::new();
                params.insert(name.to_string(), value.to_string());
                self.params = FilterParams::Text(params);
            }
            FilterShape::Range => {
                let min = number_value(form, &format!("{name}-min"));
                let max = number_value(form, &format!("{name}-max"));
                let (Some(min), Some(max)) = (min, max) else {
                    return false;
                };
                self.params = FilterParams::Range { min, max };
            }
            FilterShape::Options => {
                let key = format!("{name}[]");
                let possible_values: Vec<String> = form.get_all_text(&key).map(str::to_string).collect();
                if possible_values.is_empty() {
                    return false;
                }
                self.params = FilterParams::Options { possible_values };
            }
        }
        true
    }

    /// Render `type=value`.
    ///
    /// Fails when a text filter does not hold exactly one parameter, which
    /// only happens if it was rendered without a successful parse.
    pub fn to_query_string(&self) -> Result<String, ConfigError> {
        let key = self.decl.query_key;
        match &self.params {
            FilterParams::Text(params) => {
                let mut values = params.values();
                match (values.next(), values.next()) {
                    (Some(value), None) => Ok(format!("{key}={value}")),
                    _ => Err(ConfigError::StringFilterArity {
                        filter: key,
                        found: params.len(),
                    }),
                }
            }
            FilterParams::Range { min, max } => Ok(format!("{key}={}-{}", format_number(*min), format_number(*max))),
            FilterParams::Options { possible_values } => Ok(format!("{key}={}", possible_values.join(","))),
        }
    }

    pub fn to_json(&self) -> FilterJson<'_> {
        FilterJson {
            kind: self.decl.query_key,
            params: &self.params,
        }
    }
}

fn text_value<'a>(form: &'a FormData, key: &str) -> Option<&'a str> {
    form.get(key).and_then(FormValue::as_text).filter(|text| !text.is_empty())
}

fn number_value(form: &FormData, key: &str) -> Option<f64> {
    text_value(form, key).map(parse_float_lenient)
}
