//! Per-domain filter registries and query assembly.

use log::debug;

use super::{Filter, FilterDecl};
use crate::errors::ConfigError;
use crate::form::FormData;

/// Ordered, fixed set of filter declarations for one entity domain.
///
/// Declaration order is the order filters appear in the query string.
#[derive(Debug, Clone, Copy)]
pub struct FilterRegistry {
    pub domain: &'static str,
    pub filters: &'static [FilterDecl],
}

impl FilterRegistry {
    /// Parse every declared filter out of `form`, keeping those that are present.
    pub fn parse_form(&self, form: &FormData) -> Vec<Filter> {
        let active: Vec<Filter> = self
            .filters
            .iter()
            .filter_map(|decl| {
                let mut filter = Filter::new(*decl);
                filter.parse(form).then_some(filter)
            })
            .collect();
        debug!("{} search: {} filters active", self.domain, active.len());
        active
    }

    /// Parse several forms and concatenate the results in form order.
    pub fn parse_multiple_forms<'a, I>(&self, forms: I) -> Vec<Filter>
    where
        I: IntoIterator<Item = &'a FormData>,
    {
        forms.into_iter().flat_map(|form| self.parse_form(form)).collect()
    }
}

/// Join the query segments of `filters` with `&`.
pub fn build_query(filters: &[Filter]) -> Result<String, ConfigError> {
    let segments = filters
        .iter()
        .map(Filter::to_query_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(segments.join("&"))
}

/// `base` alone when no filter is active, `base?query` otherwise.
pub fn search_url(base: &str, filters: &[Filter]) -> Result<String, ConfigError> {
    if filters.is_empty() {
        return Ok(base.to_string());
    }
    Ok(format!("{base}?{}", build_query(filters)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: FilterRegistry = FilterRegistry {
        domain: "test",
        filters: &[
            FilterDecl::text("title", "title"),
            FilterDecl::range("size", "size"),
            FilterDecl::options("tags", "tags"),
        ],
    };

    #[test]
    fn empty_form_has_no_filters() {
        assert!(REGISTRY.parse_form(&FormData::new()).is_empty());
        assert_eq!(search_url("/view/things", &[]).unwrap(), "/view/things");
    }

    #[test]
    fn registry_order_drives_query_order() {
        let form = FormData::from_pairs([("tags[]", "a"), ("title", "x"), ("size-min", "1"), ("size-max", "2")]);
        let filters = REGISTRY.parse_form(&form);
        assert_eq!(build_query(&filters).unwrap(), "title=x&size=1-2&tags=a");
    }

    #[test]
    fn multiple_forms_keep_form_order() {
        let first = FormData::from_pairs([("tags[]", "a")]);
        let second = FormData::from_pairs([("title", "x")]);
        let filters = REGISTRY.parse_multiple_forms([&first, &second]);
        assert_eq!(search_url("/view/things", &filters).unwrap(), "/view/things?tags=a&title=x");
    }
}
