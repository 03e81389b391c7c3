//! Blog post fields and search filters.

use crate::fields::{FieldDecl, FieldRegistry, ValueKind};
use crate::filters::{FilterDecl, FilterRegistry};

pub static POST_FIELDS: FieldRegistry = FieldRegistry {
    domain: "post",
    accepts: &[ValueKind::String, ValueKind::StringList, ValueKind::Image, ValueKind::ImageList],
    fields: &[
        FieldDecl::flat("title", "title", ValueKind::String),
        FieldDecl::flat("content", "content", ValueKind::String),
        FieldDecl::flat("tags[]", "tags", ValueKind::StringList),
        FieldDecl::flat("photos[]", "files", ValueKind::ImageList),
    ],
    specification: None,
};

pub static POST_FILTERS: FilterRegistry = FilterRegistry {
    domain: "post",
    filters: &[
        FilterDecl::text("title", "title"),
        FilterDecl::options("tags", "tags"),
        FilterDecl::text("author", "author"),
    ],
};
