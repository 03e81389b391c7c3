use thiserror::Error;

use crate::fields::ValueKind;

/// Broken field/filter declarations. These never come from user input and
/// abort the whole parse or serialization pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A registry declares a field whose kind the domain cannot coerce.
    #[error("invalid value type `{kind}` for field `{field}` in {domain} registry")]
    UnsupportedValueKind {
        domain: &'static str,
        field: &'static str,
        kind: ValueKind,
    },

    /// A value kind name did not match any known kind.
    #[error("invalid value type: {name}")]
    UnknownValueKind { name: String },

    /// A string filter must hold exactly one parameter when rendered.
    #[error("string filter `{filter}` must have exactly one key (found {found})")]
    StringFilterArity { filter: &'static str, found: usize },

    /// The specification selector is not among the domain's top-level fields.
    #[error("specification selector `{selector}` is not declared in the {domain} registry")]
    MissingSelector {
        domain: &'static str,
        selector: &'static str,
    },
}

/// Top-level error type returned by herbarium operations.
#[derive(Debug, Error)]
pub enum HerbariumError {
    /// A field or filter registry is misdeclared.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A field was serialized before it parsed successfully.
    #[error("field `{field}` has no parsed value")]
    Unparsed { field: &'static str },

    /// The staged specification entry could not be decoded as a JSON object.
    #[error("malformed specification entry: {message}")]
    MalformedSpecification { message: String },

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Registration password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Registration email without an `@`.
    #[error("invalid email `{email}`")]
    InvalidEmail { email: String },

    /// A page path does not carry a usable entity id.
    #[error("no entity id in path `{path}`")]
    InvalidEntityId { path: String },
}

pub type Result<T, E = HerbariumError> = std::result::Result<T, E>;
