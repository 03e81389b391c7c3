//! Herbarium: typed form extraction for the plant catalog client.
//!
//! The crate turns submitted forms into typed [`fields::Field`] values and
//! search [`filters::Filter`]s, then serializes them into the multipart
//! payloads, JSON bodies and query strings the catalog backend expects.
//!
//! ```
//! use herbarium::domains::{PLANT_FIELDS, PLANT_FILTERS};
//! use herbarium::fields::serialize_fields;
//! use herbarium::filters::build_query;
//! use herbarium::form::FormData;
//!
//! let form = FormData::from_pairs([("category", "tree"), ("tree.height", "12.5")]);
//! let fields = PLANT_FIELDS.parse_form(&form).unwrap();
//! let payload = serialize_fields(&fields).unwrap();
//! assert!(payload.contains("specification"));
//!
//! let search = FormData::from_pairs([("height-min", "1"), ("height-max", "5")]);
//! let filters = PLANT_FILTERS.parse_form(&search);
//! assert_eq!(build_query(&filters).unwrap(), "height=1-5");
//! ```

pub mod domains;
pub mod errors;
pub mod fields;
pub mod filters;
pub mod form;
pub mod routes;

pub use domains::Domain;
pub use errors::*;
pub use fields::{Field, FieldDecl, FieldRegistry, FieldValue, ValueKind};
pub use filters::{Filter, FilterDecl, FilterParams, FilterRegistry};
pub use form::{FileEntry, FormData, FormValue};
pub use routes::{ApiRequest, Method, RequestBody, RouteContext, entity_id_from_path};
