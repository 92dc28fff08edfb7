use crate::{
    field::EntityDef,
    language::{LanguageId, LanguageKind},
    settings::I18nOptions,
    unit::TranslationUnit,
};
use seaorm_i18n_error::{config::ConfigurationError, I18nResult};
use std::collections::HashMap;
use tracing::info;

/// One registered base entity: its schema, its resolved primary key column
/// and the synthesized translation descriptor when any field is localized.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    pub def: EntityDef,
    pub primary_key: String,
    pub unit: Option<TranslationUnit>,
}

/// The plugin registry.
///
/// Created once at setup from validated [`I18nOptions`], consulted at every
/// entity definition and every storage operation, never mutated after the
/// definition phase. Dropping the registry tears the plugin down; nothing is
/// installed globally.
#[derive(Debug)]
pub struct I18n {
    options: I18nOptions,
    language_kind: LanguageKind,
    entities: HashMap<String, EntityRecord>,
}

impl I18n {
    /// Validate the options and build an empty registry.
    pub fn new(options: I18nOptions) -> I18nResult<Self> {
        if options.languages.is_empty() {
            return Err(ConfigurationError::EmptyLanguages.into());
        }
        if let Some(default) = &options.default_language {
            if !options.languages.contains(default) {
                return Err(
                    ConfigurationError::InvalidDefaultLanguage(default.to_string()).into(),
                );
            }
        }
        let language_kind = LanguageKind::of(&options.languages);
        Ok(Self {
            options,
            language_kind,
            entities: HashMap::new(),
        })
    }

    pub fn options(&self) -> &I18nOptions {
        &self.options
    }

    pub fn language_kind(&self) -> LanguageKind {
        self.language_kind
    }

    pub fn default_language(&self) -> Option<&LanguageId> {
        self.options.default_language.as_ref()
    }

    /// Whether `language` belongs to the configured list.
    pub fn is_valid_language(&self, language: &LanguageId) -> bool {
        self.options.languages.contains(language)
    }

    /// Register a base entity.
    ///
    /// Partitions its fields by the declarative `localized` list. With at
    /// least one localized field a translation descriptor is recorded and
    /// returned; with none the entity is registered untouched and `None` is
    /// returned.
    pub fn define_entity(&mut self, def: EntityDef) -> I18nResult<Option<&TranslationUnit>> {
        if self.entities.contains_key(&def.name) {
            return Err(ConfigurationError::DuplicateEntity(def.name.clone()).into());
        }
        for name in &def.localized {
            if !def.has_field(name) {
                return Err(ConfigurationError::UnknownLocalizedField {
                    entity: def.name.clone(),
                    field: name.clone(),
                }
                .into());
            }
        }

        let (_, localized) = def.partition_fields();
        let unit = if localized.is_empty() {
            None
        } else {
            let unit = TranslationUnit::new(
                &def.name,
                self.language_kind,
                localized.into_iter().cloned().collect(),
            );
            info!(
                entity = def.name.as_str(),
                table = unit.table(),
                "synthesized translation entity"
            );
            Some(unit)
        };

        let primary_key = def
            .primary_key
            .clone()
            .unwrap_or_else(|| self.options.primary_key_column().to_owned());
        let name = def.name.clone();
        let record = self.entities.entry(name).or_insert(EntityRecord {
            def,
            primary_key,
            unit,
        });
        Ok(record.unit.as_ref())
    }

    /// Look up a registered entity. Absent is `None`, never an error.
    pub fn entity(&self, name: &str) -> Option<&EntityRecord> {
        self.entities.get(name)
    }

    /// Translation descriptor for a base entity, when one was synthesized.
    pub fn unit(&self, base: &str) -> Option<&TranslationUnit> {
        self.entities.get(base).and_then(|record| record.unit.as_ref())
    }

    /// Every registered entity, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &EntityRecord> {
        self.entities.values()
    }
}
