use crate::{constants::DEFAULT_PRIMARY_KEY, language::LanguageId};
use config::{Config, Environment, File};
use seaorm_i18n_error::I18nResult;
use serde::Deserialize;

/// Plugin configuration.
///
/// Every behavior toggle defaults to enabled; `languages` is mandatory and
/// validated when the registry is constructed.
#[derive(Debug, Clone, Deserialize)]
pub struct I18nOptions {
    /// Ordered list of allowed language identifiers.
    #[serde(default)]
    pub languages: Vec<LanguageId>,

    /// Language used when an operation carries no explicit language. Must be
    /// a member of `languages`.
    #[serde(default)]
    pub default_language: Option<LanguageId>,

    /// Fall back to the default language when `get_i18n` finds no value for
    /// the requested language.
    #[serde(default = "I18nOptions::enabled")]
    pub default_language_fallback: bool,

    /// Eagerly load translation rows in the default retrieval scope.
    #[serde(default = "I18nOptions::enabled")]
    pub i18n_default_scope: bool,

    /// Expose the selectable `i18n` scope on base entities.
    #[serde(default = "I18nOptions::enabled")]
    pub add_i18n_scope: bool,

    /// Merge translation loading into user-declared named scopes.
    #[serde(default = "I18nOptions::enabled")]
    pub inject_i18n_scope: bool,

    /// Base-entity primary key column. Defaults to `id`.
    #[serde(default)]
    pub primary_key: Option<String>,
}

impl I18nOptions {
    fn enabled() -> bool {
        true
    }

    pub fn new(languages: Vec<LanguageId>) -> Self {
        Self {
            languages,
            default_language: None,
            default_language_fallback: true,
            i18n_default_scope: true,
            add_i18n_scope: true,
            inject_i18n_scope: true,
            primary_key: None,
        }
    }

    pub fn with_default_language(mut self, language: LanguageId) -> Self {
        self.default_language = Some(language);
        self
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.default_language_fallback = enabled;
        self
    }

    pub fn with_default_scope(mut self, enabled: bool) -> Self {
        self.i18n_default_scope = enabled;
        self
    }

    pub fn with_i18n_scope(mut self, enabled: bool) -> Self {
        self.add_i18n_scope = enabled;
        self
    }

    pub fn with_scope_injection(mut self, enabled: bool) -> Self {
        self.inject_i18n_scope = enabled;
        self
    }

    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    /// Load options from an optional file, overridable through
    /// `I18N__`-prefixed environment variables.
    pub fn from_file(path: &str) -> I18nResult<Self> {
        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("I18N")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("languages"),
            );
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Base-entity primary key column these options prescribe.
    pub fn primary_key_column(&self) -> &str {
        self.primary_key.as_deref().unwrap_or(DEFAULT_PRIMARY_KEY)
    }
}

impl Default for I18nOptions {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
