//! In-memory representation of a loaded base-entity row.

use crate::repository::{TranslationRepository, UpsertOutcome};
use sea_orm::ConnectionTrait;
use seaorm_i18n_error::{
    config::ConfigurationError, storage::StorageError, I18nError, I18nResult,
};
use seaorm_i18n_model::{
    constants::{ID_COL, LANGUAGE_ID_COL, PARENT_ID_COL},
    language::LanguageId,
    registry::I18n,
    unit::translation_entity_name,
};
use serde_json::{Map, Value as JsonValue};

/// One translation row loaded alongside a base instance.
///
/// `values` holds the localized columns only; the synthetic id and parent_id
/// are stripped when rows are loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRow {
    pub language_id: LanguageId,
    pub values: Map<String, JsonValue>,
}

/// Options for [`Instance::get_i18n`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GetI18nOptions {
    /// Overrides the registry-wide fallback flag when set.
    pub default_language_fallback: Option<bool>,
}

/// A materialized base-entity row plus its eagerly loaded translations.
#[derive(Debug, Clone)]
pub struct Instance {
    entity: String,
    id: i64,
    values: Map<String, JsonValue>,
    translations: Vec<TranslationRow>,
}

impl Instance {
    pub(crate) fn new(
        entity: &str,
        id: i64,
        values: Map<String, JsonValue>,
        translations: Vec<TranslationRow>,
    ) -> Self {
        Self {
            entity: entity.to_owned(),
            id,
            values,
            translations,
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn values(&self) -> &Map<String, JsonValue> {
        &self.values
    }

    /// One of the instance's own fields, by name.
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.values.get(field)
    }

    /// The translation rows loaded with the instance.
    pub fn translations(&self) -> &[TranslationRow] {
        &self.translations
    }

    pub(crate) fn set_translations(&mut self, rows: Vec<TranslationRow>) {
        self.translations = rows;
    }

    pub(crate) fn push_translation(&mut self, row: TranslationRow) {
        self.translations.push(row);
    }

    /// Project one language's translation onto the instance's own fields.
    ///
    /// Pure and idempotent: scans the already-loaded translation rows and
    /// never touches the database. An exact language match always wins;
    /// otherwise the default language's row is projected when fallback is
    /// enabled and a default is configured. With no match the instance is
    /// returned unchanged.
    pub fn get_i18n(
        &mut self,
        i18n: &I18n,
        language: &LanguageId,
        options: GetI18nOptions,
    ) -> &mut Self {
        let fallback = options
            .default_language_fallback
            .unwrap_or(i18n.options().default_language_fallback);

        if self.translations.is_empty() {
            return self;
        }

        if let Some(at) = self
            .translations
            .iter()
            .position(|row| &row.language_id == language)
        {
            self.project_row(at);
            return self;
        }

        if !fallback {
            return self;
        }
        let Some(default) = i18n.default_language() else {
            return self;
        };
        if let Some(at) = self
            .translations
            .iter()
            .position(|row| &row.language_id == default)
        {
            self.project_row(at);
        }
        self
    }

    fn project_row(&mut self, at: usize) {
        let pairs: Vec<(String, JsonValue)> = self.translations[at]
            .values
            .iter()
            .filter(|(name, _)| !is_reserved(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        for (name, value) in pairs {
            self.values.insert(name, value);
        }
    }

    /// Write one translated property for one language.
    ///
    /// Upserts the translation row keyed on (parent_id, language_id); other
    /// columns of an existing row are left untouched. The in-memory instance
    /// is not refreshed; reload it to observe the change through
    /// [`get_i18n`](Self::get_i18n).
    pub async fn set_i18n<C: ConnectionTrait>(
        &self,
        i18n: &I18n,
        conn: &C,
        language: Option<LanguageId>,
        property: &str,
        value: JsonValue,
    ) -> I18nResult<UpsertOutcome> {
        let language = match language {
            Some(language) => {
                if !i18n.is_valid_language(&language) {
                    return Err(
                        ConfigurationError::UnknownLanguage(language.to_string()).into(),
                    );
                }
                language
            }
            None => i18n
                .default_language()
                .cloned()
                .ok_or(I18nError::MissingLanguage)?,
        };
        if property.is_empty() {
            return Err(I18nError::MissingProperty);
        }
        let unit = i18n.unit(&self.entity).ok_or_else(|| {
            StorageError::EntityNotFound(translation_entity_name(&self.entity))
        })?;

        let mut values = Map::new();
        values.insert(property.to_owned(), value);
        TranslationRepository::upsert(conn, unit, self.id, &language, &values).await
    }
}

fn is_reserved(name: &str) -> bool {
    name == ID_COL || name == PARENT_ID_COL || name == LANGUAGE_ID_COL
}

#[cfg(test)]
mod tests {
    use super::*;
    use seaorm_i18n_model::{EntityDef, FieldDef, FieldKind, I18nOptions};
    use serde_json::json;

    fn lang(code: &str) -> LanguageId {
        LanguageId::from(code)
    }

    fn registry(fallback: bool) -> I18n {
        let options = I18nOptions::new(vec![lang("FR"), lang("EN"), lang("ES")])
            .with_default_language(lang("FR"))
            .with_fallback(fallback);
        let mut i18n = I18n::new(options).unwrap();
        i18n.define_entity(
            EntityDef::new("product")
                .field(FieldDef::new("label", FieldKind::Text))
                .field(FieldDef::new("reference", FieldKind::Text))
                .localized(["label"]),
        )
        .unwrap();
        i18n
    }

    fn row(language: &str, label: &str) -> TranslationRow {
        let mut values = Map::new();
        values.insert("label".to_owned(), json!(label));
        TranslationRow {
            language_id: lang(language),
            values,
        }
    }

    fn instance(rows: Vec<TranslationRow>) -> Instance {
        let mut values = Map::new();
        values.insert("id".to_owned(), json!(1));
        values.insert("label".to_owned(), json!("base"));
        values.insert("reference".to_owned(), json!("random"));
        Instance::new("product", 1, values, rows)
    }

    #[test]
    fn no_loaded_translations_leave_the_instance_unchanged() {
        let i18n = registry(true);
        let mut instance = instance(Vec::new());
        instance.get_i18n(&i18n, &lang("EN"), GetI18nOptions::default());
        assert_eq!(instance.get("label"), Some(&json!("base")));
    }

    #[test]
    fn exact_match_wins_regardless_of_fallback() {
        let i18n = registry(false);
        let mut instance = instance(vec![row("FR", "fr-label"), row("EN", "en-label")]);
        instance.get_i18n(&i18n, &lang("EN"), GetI18nOptions::default());
        assert_eq!(instance.get("label"), Some(&json!("en-label")));
    }

    #[test]
    fn fallback_projects_the_default_language() {
        let i18n = registry(true);
        let mut instance = instance(vec![row("FR", "fr-label")]);
        instance.get_i18n(&i18n, &lang("EN"), GetI18nOptions::default());
        assert_eq!(instance.get("label"), Some(&json!("fr-label")));
    }

    #[test]
    fn disabled_fallback_leaves_the_instance_unchanged() {
        let i18n = registry(false);
        let mut instance = instance(vec![row("FR", "fr-label")]);
        instance.get_i18n(&i18n, &lang("EN"), GetI18nOptions::default());
        assert_eq!(instance.get("label"), Some(&json!("base")));
    }

    #[test]
    fn per_call_option_overrides_the_registry_flag() {
        let i18n = registry(true);
        let mut instance = instance(vec![row("FR", "fr-label")]);
        instance.get_i18n(
            &i18n,
            &lang("EN"),
            GetI18nOptions {
                default_language_fallback: Some(false),
            },
        );
        assert_eq!(instance.get("label"), Some(&json!("base")));
    }

    #[test]
    fn no_match_at_all_leaves_the_instance_unchanged() {
        let i18n = registry(true);
        let mut instance = instance(vec![row("ES", "es-label")]);
        instance.get_i18n(&i18n, &lang("EN"), GetI18nOptions::default());
        assert_eq!(instance.get("label"), Some(&json!("base")));
    }

    #[test]
    fn projection_is_idempotent() {
        let i18n = registry(true);
        let mut instance = instance(vec![row("EN", "en-label")]);
        instance.get_i18n(&i18n, &lang("EN"), GetI18nOptions::default());
        instance.get_i18n(&i18n, &lang("EN"), GetI18nOptions::default());
        assert_eq!(instance.get("label"), Some(&json!("en-label")));
    }

    #[test]
    fn reserved_columns_are_never_projected() {
        let i18n = registry(true);
        let mut tainted = row("EN", "en-label");
        tainted.values.insert("parent_id".to_owned(), json!(99));
        tainted.values.insert("id".to_owned(), json!(42));
        let mut instance = instance(vec![tainted]);
        instance.get_i18n(&i18n, &lang("EN"), GetI18nOptions::default());
        assert_eq!(instance.get("id"), Some(&json!(1)));
        assert_eq!(instance.get("label"), Some(&json!("en-label")));
    }
}
