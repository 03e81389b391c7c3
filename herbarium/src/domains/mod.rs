//! Entity domains and their registries.

pub mod album;
pub mod auth;
pub mod plant;
pub mod post;

use std::fmt;

use serde::Serialize;

use crate::fields::FieldRegistry;
use crate::filters::FilterRegistry;

pub use album::{AlbumDraft, AlbumEdit, SelectionDiff, parse_id_list};
pub use auth::{Credentials, Registration};
pub use plant::{PLANT_FIELDS, PLANT_FILTERS};
pub use post::{POST_FIELDS, POST_FILTERS};

/// Entity domains with form-driven fields and search filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Plant,
    Post,
}

impl Domain {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Domain::Plant => "plant",
            Domain::Post => "post",
        }
    }

    #[inline]
    pub fn fields(self) -> &'static FieldRegistry {
        match self {
            Domain::Plant => &PLANT_FIELDS,
            Domain::Post => &POST_FIELDS,
        }
    }

    #[inline]
    pub fn filters(self) -> &'static FilterRegistry {
        match self {
            Domain::Plant => &PLANT_FILTERS,
            Domain::Post => &POST_FILTERS,
        }
    }

    /// Plural path segment of the domain's list page (`plants`, `posts`).
    #[inline]
    pub const fn collection(self) -> &'static str {
        match self {
            Domain::Plant => "plants",
            Domain::Post => "posts",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
