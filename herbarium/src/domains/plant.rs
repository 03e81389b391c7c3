//! Plant catalog fields and search filters.

use crate::fields::{FieldDecl, FieldRegistry, SpecificationScope, ValueKind};
use crate::filters::{FilterDecl, FilterRegistry};

/// Top-level plant fields. `category` selects the specification scope.
pub const PLANT_FIELD_DECLS: &[FieldDecl] = &[
    FieldDecl::flat("name", "name", ValueKind::String),
    FieldDecl::flat("latin-name", "latin_name", ValueKind::String),
    FieldDecl::flat("description", "description", ValueKind::String),
    FieldDecl::flat("category", "category", ValueKind::String),
    FieldDecl::flat("photo", "file", ValueKind::Image),
];

/// Per-category specification fields, read from `<category>.<id>` inputs.
pub const PLANT_SPECIFICATION_DECLS: &[FieldDecl] = &[
    FieldDecl::specification("height", "height_m", ValueKind::Float),
    FieldDecl::specification("diameter", "diameter_m", ValueKind::Float),
    FieldDecl::specification("flowering-period", "flowering_period", ValueKind::String),
    FieldDecl::specification("winter-hardiness", "winter_hardiness", ValueKind::Int),
    FieldDecl::specification("light-relation", "light_relation", ValueKind::String),
    FieldDecl::specification("soil-type", "soil_type", ValueKind::String),
    FieldDecl::specification("soil-acidity", "soil_acidity", ValueKind::Int),
    FieldDecl::specification("soil-moisture", "soil_moisture", ValueKind::String),
];

pub static PLANT_FIELDS: FieldRegistry = FieldRegistry {
    domain: "plant",
    accepts: &[ValueKind::String, ValueKind::Float, ValueKind::Int, ValueKind::Image],
    fields: PLANT_FIELD_DECLS,
    specification: Some(SpecificationScope {
        selector: "category",
        separator: ".",
        fields: PLANT_SPECIFICATION_DECLS,
    }),
};

pub static PLANT_FILTERS: FilterRegistry = FilterRegistry {
    domain: "plant",
    filters: &[
        FilterDecl::text("name", "name"),
        FilterDecl::text("latin_name", "latin-name"),
        FilterDecl::range("height", "height"),
        FilterDecl::options("light_relation", "light-relation"),
        FilterDecl::options("soil_type", "soil-type"),
        FilterDecl::range("soil_acidity", "soil-acidity"),
        FilterDecl::options("soil_moisture", "soil-moisture"),
        FilterDecl::options("category", "category"),
        FilterDecl::options("flowering_period", "flowering-period"),
        FilterDecl::range("winter_hardiness", "winter-hardiness"),
        FilterDecl::range("diameter", "diameter"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plant_registry_is_well_formed() {
        assert_eq!(PLANT_FIELDS.validate(), Ok(()));
    }
}
