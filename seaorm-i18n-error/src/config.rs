use thiserror::Error;

/// Configuration-time failures, raised synchronously while constructing the
/// registry or defining an entity. Fatal to setup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("languages list is mandatory and can not be empty")]
    EmptyLanguages,

    #[error("default language is invalid: {0}")]
    InvalidDefaultLanguage(String),

    /// A language outside the configured list was supplied to a hook or to
    /// the setter.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("entity is already defined: {0}")]
    DuplicateEntity(String),

    /// The declarative localized list names a field the entity does not have.
    #[error("localized field does not exist on entity {entity}: {field}")]
    UnknownLocalizedField { entity: String, field: String },

    /// A named scope was requested that the configuration does not expose.
    #[error("scope is not available: {0}")]
    UnavailableScope(String),
}
