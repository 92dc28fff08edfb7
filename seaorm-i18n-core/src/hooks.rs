//! Lifecycle hooks keeping translation rows in sync with base rows.

use crate::{
    client::load_instance,
    instance::Instance,
    repository::{BaseRepository, TranslationRepository},
};
use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use seaorm_i18n_error::{config::ConfigurationError, I18nError, I18nResult};
use seaorm_i18n_model::{language::LanguageId, registry::I18n};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, instrument, warn};

/// Options accompanying a create call.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Language of the seeded translation row; the configured default is
    /// used when absent.
    pub language_id: Option<LanguageId>,
}

/// Options accompanying an update call.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Language the localized changes are written under; the configured
    /// default is used when absent.
    pub language_id: Option<LanguageId>,
}

/// Reactions to base-entity lifecycle events.
///
/// Implemented by the registry, so integrations drive the hooks explicitly
/// instead of patching a process-global definition lifecycle. Every hook is
/// a trivial success for entities without a translation unit.
#[async_trait]
pub trait LifecycleHooks {
    /// After a base row is persisted: seed its first translation row and
    /// reload the instance. On translation failure the freshly created base
    /// row is deleted again and the original error re-raised.
    async fn after_create<C: ConnectionTrait>(
        &self,
        conn: &C,
        instance: &mut Instance,
        options: &CreateOptions,
    ) -> I18nResult<()>;

    /// After a base update: route localized changes into a translation
    /// upsert keyed on (parent_id, language_id).
    async fn after_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        instance: &Instance,
        localized: &Map<String, JsonValue>,
        options: &UpdateOptions,
    ) -> I18nResult<()>;

    /// After a base row is destroyed: drop every translation row of the
    /// parent.
    async fn after_delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        instance: &Instance,
    ) -> I18nResult<()>;
}

#[async_trait]
impl LifecycleHooks for I18n {
    #[instrument(name = "i18n-after-create", skip_all)]
    async fn after_create<C: ConnectionTrait>(
        &self,
        conn: &C,
        instance: &mut Instance,
        options: &CreateOptions,
    ) -> I18nResult<()> {
        let Some(record) = self.entity(instance.entity()) else {
            return Ok(());
        };
        let Some(unit) = record.unit.as_ref() else {
            return Ok(());
        };

        // The base row is already persisted, so every failure from here on
        // (language resolution included) must remove it again to keep the
        // create sequence all-or-nothing.
        let seeded = async {
            let language = resolve_language(self, options.language_id.as_ref())?;

            // Copy every base field that is also a translation column.
            let mut defaults = Map::new();
            for (name, value) in instance.values() {
                if unit.has_column(name) {
                    defaults.insert(name.clone(), value.clone());
                }
            }

            TranslationRepository::find_or_create(
                conn,
                unit,
                instance.id(),
                &language,
                &defaults,
            )
            .await
        }
        .await;

        match seeded {
            Ok(_) => {
                // Reload so eagerly loaded associations include the new row.
                if let Some(fresh) = load_instance(self, record, conn, instance.id()).await? {
                    *instance = fresh;
                }
                Ok(())
            }
            Err(error) => {
                // Compensating action: the base row and its translation are
                // two separate writes, so a failed translation seed must
                // remove the just-created base row.
                warn!(
                    entity = instance.entity(),
                    id = instance.id(),
                    "translation seed failed, removing base row"
                );
                BaseRepository::delete(conn, record, instance.id()).await?;
                Err(error)
            }
        }
    }

    #[instrument(name = "i18n-after-update", skip_all)]
    async fn after_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        instance: &Instance,
        localized: &Map<String, JsonValue>,
        options: &UpdateOptions,
    ) -> I18nResult<()> {
        let Some(unit) = self.unit(instance.entity()) else {
            return Ok(());
        };
        if localized.is_empty() {
            return Ok(());
        }
        let language = resolve_language(self, options.language_id.as_ref())?;
        TranslationRepository::upsert(conn, unit, instance.id(), &language, localized).await?;
        Ok(())
    }

    #[instrument(name = "i18n-after-delete", skip_all)]
    async fn after_delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        instance: &Instance,
    ) -> I18nResult<()> {
        let Some(unit) = self.unit(instance.entity()) else {
            return Ok(());
        };
        let removed =
            TranslationRepository::delete_by_parent(conn, unit, instance.id()).await?;
        debug!(
            entity = instance.entity(),
            id = instance.id(),
            removed,
            "translation rows removed with parent"
        );
        Ok(())
    }
}

/// The operation's language: the supplied one (validated against the
/// configured list) or the configured default.
fn resolve_language(i18n: &I18n, supplied: Option<&LanguageId>) -> I18nResult<LanguageId> {
    match supplied {
        Some(language) => {
            if !i18n.is_valid_language(language) {
                return Err(ConfigurationError::UnknownLanguage(language.to_string()).into());
            }
            Ok(language.clone())
        }
        None => i18n
            .default_language()
            .cloned()
            .ok_or(I18nError::MissingLanguage),
    }
}
