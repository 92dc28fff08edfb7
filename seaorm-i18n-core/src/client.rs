//! Host-integration surface: entity operations that drive the hooks.

use crate::{
    hooks::{CreateOptions, LifecycleHooks, UpdateOptions},
    instance::Instance,
    repository::{BaseRepository, TranslationRepository},
};
use sea_orm::ConnectionTrait;
use seaorm_i18n_error::{config::ConfigurationError, storage::StorageError, I18nResult};
use seaorm_i18n_model::{
    constants::I18N_SCOPE,
    language::LanguageId,
    registry::{EntityRecord, I18n},
};
use serde_json::{Map, Value as JsonValue};
use tracing::instrument;

/// Operations on one registered entity.
///
/// All methods are generic over the connection, so callers holding a
/// transaction get the whole operation inside it.
pub struct EntityClient<'a> {
    i18n: &'a I18n,
    record: &'a EntityRecord,
}

impl<'a> EntityClient<'a> {
    /// Client for a registered entity, or `None` when it was never defined.
    pub fn new(i18n: &'a I18n, entity: &str) -> Option<Self> {
        i18n.entity(entity).map(|record| Self { i18n, record })
    }

    /// Insert a base row, then run the create hook: the first translation
    /// row is seeded and the instance reloaded. When the hook fails the base
    /// row has already been removed again and the original error surfaces.
    #[instrument(name = "i18n-create", skip_all)]
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        values: Map<String, JsonValue>,
        options: CreateOptions,
    ) -> I18nResult<Instance> {
        let id = BaseRepository::insert(conn, self.record, &values).await?;

        let mut all = values;
        all.insert(self.record.primary_key.clone(), JsonValue::from(id));
        let mut instance = Instance::new(&self.record.def.name, id, all, Vec::new());

        self.i18n.after_create(conn, &mut instance, &options).await?;
        Ok(instance)
    }

    /// Update one row: universal changes hit the base table, localized
    /// changes are routed to the translation upsert by the update hook.
    /// Returns the reloaded instance.
    #[instrument(name = "i18n-update", skip_all)]
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i64,
        changes: Map<String, JsonValue>,
        options: UpdateOptions,
    ) -> I18nResult<Instance> {
        let mut universal = Map::new();
        let mut localized = Map::new();
        for (name, value) in changes {
            let translated = self
                .record
                .unit
                .as_ref()
                .is_some_and(|unit| unit.has_column(&name));
            if translated {
                localized.insert(name, value);
            } else {
                universal.insert(name, value);
            }
        }

        if !universal.is_empty() {
            BaseRepository::update(conn, self.record, id, &universal).await?;
        }

        let instance = load_instance(self.i18n, self.record, conn, id)
            .await?
            .ok_or_else(|| StorageError::EntityNotFound(self.record.def.name.clone()))?;
        self.i18n
            .after_update(conn, &instance, &localized, &options)
            .await?;

        if localized.is_empty() {
            return Ok(instance);
        }
        // Reload once more so the returned instance carries the fresh
        // translation rows.
        load_instance(self.i18n, self.record, conn, id)
            .await?
            .ok_or_else(|| StorageError::EntityNotFound(self.record.def.name.clone()).into())
    }

    /// Delete the base row; the delete hook then removes its translations.
    #[instrument(name = "i18n-destroy", skip_all)]
    pub async fn destroy<C: ConnectionTrait>(
        &self,
        conn: &C,
        instance: &Instance,
    ) -> I18nResult<()> {
        BaseRepository::delete(conn, self.record, instance.id()).await?;
        self.i18n.after_delete(conn, instance).await?;
        Ok(())
    }

    /// Default-scope lookup by primary key.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i64,
    ) -> I18nResult<Option<Instance>> {
        load_instance(self.i18n, self.record, conn, id).await
    }

    /// Default-scope lookup of the first row matching the equality filters.
    pub async fn find_one<C: ConnectionTrait>(
        &self,
        conn: &C,
        filters: &[(&str, JsonValue)],
    ) -> I18nResult<Option<Instance>> {
        let mut instances = self.find_all(conn, filters).await?;
        if instances.is_empty() {
            Ok(None)
        } else {
            Ok(Some(instances.remove(0)))
        }
    }

    /// Default-scope lookup of every row matching the equality filters.
    pub async fn find_all<C: ConnectionTrait>(
        &self,
        conn: &C,
        filters: &[(&str, JsonValue)],
    ) -> I18nResult<Vec<Instance>> {
        let rows = BaseRepository::find_all(conn, self.record, filters).await?;
        let mut instances: Vec<Instance> = rows
            .into_iter()
            .map(|(id, values)| Instance::new(&self.record.def.name, id, values, Vec::new()))
            .collect();
        if self.i18n.options().i18n_default_scope {
            self.attach_translations(conn, &mut instances, None).await?;
        }
        Ok(instances)
    }

    /// The selectable `i18n` scope: translation loading is explicit here,
    /// restricted to one language when one is given.
    pub async fn find_all_i18n<C: ConnectionTrait>(
        &self,
        conn: &C,
        language: Option<&LanguageId>,
        filters: &[(&str, JsonValue)],
    ) -> I18nResult<Vec<Instance>> {
        if !self.i18n.options().add_i18n_scope {
            return Err(ConfigurationError::UnavailableScope(I18N_SCOPE.to_owned()).into());
        }
        let rows = BaseRepository::find_all(conn, self.record, filters).await?;
        let mut instances: Vec<Instance> = rows
            .into_iter()
            .map(|(id, values)| Instance::new(&self.record.def.name, id, values, Vec::new()))
            .collect();
        self.attach_translations(conn, &mut instances, language)
            .await?;
        Ok(instances)
    }

    /// A user-declared named scope; translation loading is merged in when
    /// scope injection is enabled.
    pub async fn find_scoped<C: ConnectionTrait>(
        &self,
        conn: &C,
        scope: &str,
    ) -> I18nResult<Vec<Instance>> {
        let Some(named) = self.record.def.scopes.iter().find(|s| s.name == scope) else {
            return Err(ConfigurationError::UnavailableScope(scope.to_owned()).into());
        };
        let filters: Vec<(&str, JsonValue)> = named
            .filters
            .iter()
            .map(|filter| (filter.field.as_str(), filter.value.clone()))
            .collect();
        let rows = BaseRepository::find_all(conn, self.record, &filters).await?;
        let mut instances: Vec<Instance> = rows
            .into_iter()
            .map(|(id, values)| Instance::new(&self.record.def.name, id, values, Vec::new()))
            .collect();
        if self.i18n.options().inject_i18n_scope {
            self.attach_translations(conn, &mut instances, None).await?;
        }
        Ok(instances)
    }

    async fn attach_translations<C: ConnectionTrait>(
        &self,
        conn: &C,
        instances: &mut [Instance],
        language: Option<&LanguageId>,
    ) -> I18nResult<()> {
        let Some(unit) = self.record.unit.as_ref() else {
            return Ok(());
        };
        if instances.is_empty() {
            return Ok(());
        }
        let parents: Vec<i64> = instances.iter().map(Instance::id).collect();
        let rows = TranslationRepository::find_by_parents(conn, unit, &parents, language).await?;
        for (parent, row) in rows {
            if let Some(instance) = instances
                .iter_mut()
                .find(|instance| instance.id() == parent)
            {
                instance.push_translation(row);
            }
        }
        Ok(())
    }
}

/// Load one instance by primary key with the default scope's eager
/// translation loading applied.
pub(crate) async fn load_instance<C: ConnectionTrait>(
    i18n: &I18n,
    record: &EntityRecord,
    conn: &C,
    id: i64,
) -> I18nResult<Option<Instance>> {
    let Some((id, values)) = BaseRepository::find_by_id(conn, record, id).await? else {
        return Ok(None);
    };
    let mut instance = Instance::new(&record.def.name, id, values, Vec::new());
    if i18n.options().i18n_default_scope {
        if let Some(unit) = record.unit.as_ref() {
            let rows = TranslationRepository::find_by_parents(conn, unit, &[id], None).await?;
            instance.set_translations(rows.into_iter().map(|(_, row)| row).collect());
        }
    }
    Ok(Some(instance))
}
