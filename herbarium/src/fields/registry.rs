//! Per-domain field registries and form parsing.

use log::{debug, trace};

use super::{Field, FieldDecl, FieldValue, ValueKind};
use crate::errors::ConfigError;
use crate::form::FormData;

/// Category-scoped sub-fields, read from a narrowed copy of the form.
///
/// When the selector field parses to `tree`, every entry keyed `tree.<id>`
/// is re-keyed to `<id>` and the scoped fields are parsed from that view.
#[derive(Debug, Clone, Copy)]
pub struct SpecificationScope {
    /// Id of the top-level field whose value selects the scope.
    pub selector: &'static str,
    pub separator: &'static str,
    pub fields: &'static [FieldDecl],
}

/// Ordered, fixed set of field declarations for one entity domain.
#[derive(Debug, Clone, Copy)]
pub struct FieldRegistry {
    pub domain: &'static str,
    /// Kinds this domain knows how to coerce.
    pub accepts: &'static [ValueKind],
    pub fields: &'static [FieldDecl],
    pub specification: Option<SpecificationScope>,
}

impl FieldRegistry {
    /// Check every declaration against the domain's accepted kinds and the
    /// specification selector against the top-level fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scoped = self.specification.iter().flat_map(|scope| scope.fields.iter());
        for decl in self.fields.iter().chain(scoped) {
            self.check_kind(decl)?;
        }
        if let Some(scope) = &self.specification
            && !self.fields.iter().any(|decl| decl.id == scope.selector)
        {
            return Err(ConfigError::MissingSelector {
                domain: self.domain,
                selector: scope.selector,
            });
        }
        Ok(())
    }

    /// Parse every declared field out of `form`, keeping those that are present.
    ///
    /// Top-level fields come first in declaration order, followed by the
    /// specification fields of the selected category.
    pub fn parse_form(&self, form: &FormData) -> Result<Vec<Field>, ConfigError> {
        self.validate()?;

        let mut active = Vec::with_capacity(self.fields.len());
        parse_declared(self.fields, form, &mut active);

        let Some(scope) = &self.specification else {
            debug!("{} form: {} fields parsed", self.domain, active.len());
            return Ok(active);
        };

        let category = active
            .iter()
            .find(|field| field.id() == scope.selector)
            .and_then(Field::value)
            .and_then(|value| match value {
                FieldValue::Text(text) => Some(text.clone()),
                _ => None,
            });
        let Some(category) = category else {
            debug!("{} form: no {} selected, {} fields parsed", self.domain, scope.selector, active.len());
            return Ok(active);
        };

        let narrowed = form.narrow(&format!("{category}{}", scope.separator));
        if narrowed.is_empty() {
            debug!("{} form: no specification entries for {} `{}`", self.domain, scope.selector, category);
        }
        parse_declared(scope.fields, &narrowed, &mut active);

        debug!("{} form: {} fields parsed for {} `{}`", self.domain, active.len(), scope.selector, category);
        Ok(active)
    }

    /// Parse several forms and concatenate the results in form order.
    pub fn parse_multiple_forms<'a, I>(&self, forms: I) -> Result<Vec<Field>, ConfigError>
    where
        I: IntoIterator<Item = &'a FormData>,
    {
        let mut active = Vec::new();
        for form in forms {
            active.extend(self.parse_form(form)?);
        }
        Ok(active)
    }

    fn check_kind(&self, decl: &FieldDecl) -> Result<(), ConfigError> {
        if self.accepts.contains(&decl.kind) {
            Ok(())
        } else {
            Err(ConfigError::UnsupportedValueKind {
                domain: self.domain,
                field: decl.id,
                kind: decl.kind,
            })
        }
    }
}

fn parse_declared(decls: &[FieldDecl], form: &FormData, active: &mut Vec<Field>) {
    for decl in decls {
        let mut field = Field::new(*decl);
        if field.parse(form) {
            active.push(field);
        } else {
            trace!("field `{}` absent", decl.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALARS: &[ValueKind] = &[ValueKind::String, ValueKind::Float];

    const TOP: &[FieldDecl] = &[
        FieldDecl::flat("name", "name", ValueKind::String),
        FieldDecl::flat("kind", "kind", ValueKind::String),
    ];

    const SCOPED: &[FieldDecl] = &[FieldDecl::specification("size", "size_m", ValueKind::Float)];

    const REGISTRY: FieldRegistry = FieldRegistry {
        domain: "test",
        accepts: SCALARS,
        fields: TOP,
        specification: Some(SpecificationScope {
            selector: "kind",
            separator: ".",
            fields: SCOPED,
        }),
    };

    #[test]
    fn empty_form_parses_nothing() {
        assert!(REGISTRY.parse_form(&FormData::new()).unwrap().is_empty());
    }

    #[test]
    fn scoped_fields_follow_selected_category() {
        let form = FormData::from_pairs([("kind", "bush"), ("bush.size", "2"), ("tree.size", "9")]);
        let fields = REGISTRY.parse_form(&form).unwrap();
        let ids: Vec<&str> = fields.iter().map(Field::id).collect();
        assert_eq!(ids, vec!["kind", "size"]);
        assert_eq!(fields[1].value(), Some(&FieldValue::Float(2.0)));
    }

    #[test]
    fn scoped_fields_ignored_without_category() {
        let form = FormData::from_pairs([("name", "x"), ("bush.size", "2")]);
        let ids: Vec<&str> = REGISTRY.parse_form(&form).unwrap().iter().map(Field::id).collect();
        assert_eq!(ids, vec!["name"]);
    }

    #[test]
    fn category_without_sub_fields_is_a_no_op() {
        let form = FormData::from_pairs([("kind", "moss")]);
        assert_eq!(REGISTRY.parse_form(&form).unwrap().len(), 1);
    }

    #[test]
    fn unsupported_kind_aborts_parse() {
        const BAD: FieldRegistry = FieldRegistry {
            domain: "test",
            accepts: SCALARS,
            fields: &[FieldDecl::flat("tags[]", "tags", ValueKind::StringList)],
            specification: None,
        };
        let err = BAD.parse_form(&FormData::new()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedValueKind {
                domain: "test",
                field: "tags[]",
                kind: ValueKind::StringList,
            }
        );
    }

    #[test]
    fn undeclared_selector_aborts_parse() {
        const BAD: FieldRegistry = FieldRegistry {
            domain: "test",
            accepts: SCALARS,
            fields: &[FieldDecl::flat("name", "name", ValueKind::String)],
            specification: Some(SpecificationScope {
                selector: "kind",
                separator: ".",
                fields: SCOPED,
            }),
        };
        assert!(matches!(
            BAD.parse_form(&FormData::new()),
            Err(ConfigError::MissingSelector { selector: "kind", .. })
        ));
    }

    #[test]
    fn multiple_forms_concatenate_in_order() {
        let first = FormData::from_pairs([("kind", "bush")]);
        let second = FormData::from_pairs([("name", "Fern")]);
        let fields = REGISTRY.parse_multiple_forms([&first, &second]).unwrap();
        let ids: Vec<&str> = fields.iter().map(Field::id).collect();
        assert_eq!(ids, vec!["kind", "name"]);
    }
}
