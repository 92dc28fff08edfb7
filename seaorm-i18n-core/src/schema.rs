//! Registry-driven schema synchronization.

use sea_orm::ConnectionTrait;
use seaorm_i18n_error::I18nResult;
use seaorm_i18n_model::registry::I18n;
use tracing::{info, instrument};

/// Creates and drops the tables a registry describes.
///
/// Translation tables only come into existence at registration time, so
/// their DDL is executed directly instead of being listed in a static
/// migrator.
pub struct Schema;

impl Schema {
    /// Create every base and translation table plus the translation indexes.
    #[instrument(name = "i18n-schema-sync", skip_all)]
    pub async fn sync<C: ConnectionTrait>(i18n: &I18n, conn: &C) -> I18nResult<()> {
        let backend = conn.get_database_backend();
        for record in i18n.records() {
            conn.execute(backend.build(&record.def.to_create_table_stmt(&record.primary_key)))
                .await?;
            if let Some(unit) = &record.unit {
                conn.execute(backend.build(&unit.to_create_table_stmt()))
                    .await?;
                for index in unit.to_create_indexes_stmt() {
                    conn.execute(backend.build(&index)).await?;
                }
                info!(
                    entity = record.def.name.as_str(),
                    table = unit.table(),
                    "translation table ready"
                );
            }
        }
        Ok(())
    }

    /// Drop everything the registry describes, translation tables first.
    #[instrument(name = "i18n-schema-drop", skip_all)]
    pub async fn drop<C: ConnectionTrait>(i18n: &I18n, conn: &C) -> I18nResult<()> {
        let backend = conn.get_database_backend();
        for record in i18n.records() {
            if let Some(unit) = &record.unit {
                conn.execute(backend.build(&unit.to_drop_table_stmt()))
                    .await?;
            }
            conn.execute(backend.build(&record.def.to_drop_table_stmt()))
                .await?;
        }
        Ok(())
    }
}
