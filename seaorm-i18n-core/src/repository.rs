//! Dynamic statement repositories for base and translation tables.
//!
//! All operations are generic over [`ConnectionTrait`] so callers can pass a
//! plain connection or a transaction. Statements are assembled with the
//! `sea_query` builders SeaORM re-exports, since the tables they touch are
//! described at runtime.

use crate::instance::TranslationRow;
use sea_orm::{
    sea_query::{Alias, Expr, ExprTrait, Order, Query, SelectStatement, SimpleExpr},
    ConnectionTrait, QueryResult, Value,
};
use seaorm_i18n_error::{storage::StorageError, I18nResult};
use seaorm_i18n_model::{
    constants::{ID_COL, LANGUAGE_ID_COL, PARENT_ID_COL},
    language::{LanguageId, LanguageKind},
    registry::EntityRecord,
    unit::TranslationUnit,
    value::{from_query_result, to_db_value},
};
use serde_json::{Map, Value as JsonValue};
use tracing::instrument;

/// Outcome of a translation upsert, mirroring the host's created/updated
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Row operations on a base table.
pub struct BaseRepository;

impl BaseRepository {
    /// Insert a base row and return its primary key.
    ///
    /// The primary key may be supplied in `values`; otherwise the backend's
    /// auto-increment value is returned.
    pub async fn insert<C: ConnectionTrait>(
        conn: &C,
        record: &EntityRecord,
        values: &Map<String, JsonValue>,
    ) -> I18nResult<i64> {
        let mut columns = Vec::new();
        let mut binds: Vec<SimpleExpr> = Vec::new();
        let mut explicit_id = None;
        for (name, value) in values {
            if name == &record.primary_key {
                let id = value.as_i64().ok_or_else(|| {
                    StorageError::Statement(format!("primary key must be an integer: {value}"))
                })?;
                explicit_id = Some(id);
                columns.push(Alias::new(name.as_str()));
                binds.push(Value::from(id).into());
                continue;
            }
            let field = record.def.field_def(name).ok_or_else(|| {
                StorageError::Statement(format!(
                    "unknown column on {}: {name}",
                    record.def.name
                ))
            })?;
            columns.push(Alias::new(name.as_str()));
            binds.push(to_db_value(field.kind, value)?.into());
        }

        let mut stmt = Query::insert();
        stmt.into_table(Alias::new(record.def.name.as_str()))
            .columns(columns);
        stmt.values(binds)
            .map_err(|e| StorageError::Statement(e.to_string()))?;

        let backend = conn.get_database_backend();
        let result = conn.execute(backend.build(&stmt)).await?;
        Ok(explicit_id.unwrap_or(result.last_insert_id() as i64))
    }

    /// Patch columns of one row. Returns the affected row count.
    pub async fn update<C: ConnectionTrait>(
        conn: &C,
        record: &EntityRecord,
        id: i64,
        values: &Map<String, JsonValue>,
    ) -> I18nResult<u64> {
        if values.is_empty() {
            return Ok(0);
        }
        let mut stmt = Query::update();
        stmt.table(Alias::new(record.def.name.as_str()));
        for (name, value) in values {
            let field = record.def.field_def(name).ok_or_else(|| {
                StorageError::Statement(format!(
                    "unknown column on {}: {name}",
                    record.def.name
                ))
            })?;
            stmt.value(Alias::new(name.as_str()), to_db_value(field.kind, value)?);
        }
        stmt.and_where(Expr::col(Alias::new(record.primary_key.as_str())).eq(id));

        let backend = conn.get_database_backend();
        let result = conn.execute(backend.build(&stmt)).await?;
        Ok(result.rows_affected())
    }

    /// Delete one row by primary key. Returns the affected row count.
    pub async fn delete<C: ConnectionTrait>(
        conn: &C,
        record: &EntityRecord,
        id: i64,
    ) -> I18nResult<u64> {
        let mut stmt = Query::delete();
        stmt.from_table(Alias::new(record.def.name.as_str()))
            .and_where(Expr::col(Alias::new(record.primary_key.as_str())).eq(id));

        let backend = conn.get_database_backend();
        let result = conn.execute(backend.build(&stmt)).await?;
        Ok(result.rows_affected())
    }

    /// Select one row by primary key.
    pub async fn find_by_id<C: ConnectionTrait>(
        conn: &C,
        record: &EntityRecord,
        id: i64,
    ) -> I18nResult<Option<(i64, Map<String, JsonValue>)>> {
        let mut stmt = Self::select(record);
        stmt.and_where(Expr::col(Alias::new(record.primary_key.as_str())).eq(id));

        let backend = conn.get_database_backend();
        let row = conn.query_one(backend.build(&stmt)).await?;
        row.map(|row| Self::decode(record, &row)).transpose()
    }

    /// Select every row matching the equality filters, in primary key order.
    pub async fn find_all<C: ConnectionTrait>(
        conn: &C,
        record: &EntityRecord,
        filters: &[(&str, JsonValue)],
    ) -> I18nResult<Vec<(i64, Map<String, JsonValue>)>> {
        let mut stmt = Self::select(record);
        for (name, value) in filters {
            let field = record.def.field_def(name).ok_or_else(|| {
                StorageError::Statement(format!(
                    "unknown column on {}: {name}",
                    record.def.name
                ))
            })?;
            stmt.and_where(
                Expr::col(Alias::new(*name)).eq(to_db_value(field.kind, value)?),
            );
        }

        let backend = conn.get_database_backend();
        let rows = conn.query_all(backend.build(&stmt)).await?;
        rows.iter().map(|row| Self::decode(record, row)).collect()
    }

    fn select(record: &EntityRecord) -> SelectStatement {
        let mut stmt = Query::select();
        stmt.column(Alias::new(record.primary_key.as_str()));
        for field in &record.def.fields {
            stmt.column(Alias::new(field.name.as_str()));
        }
        stmt.from(Alias::new(record.def.name.as_str()))
            .order_by(Alias::new(record.primary_key.as_str()), Order::Asc);
        stmt
    }

    fn decode(
        record: &EntityRecord,
        row: &QueryResult,
    ) -> I18nResult<(i64, Map<String, JsonValue>)> {
        let id: i64 = row.try_get("", record.primary_key.as_str())?;
        let mut values = Map::new();
        values.insert(record.primary_key.clone(), JsonValue::from(id));
        for field in &record.def.fields {
            values.insert(
                field.name.clone(),
                from_query_result(row, &field.name, field.kind)?,
            );
        }
        Ok((id, values))
    }
}

/// Row operations on a synthesized translation table.
pub struct TranslationRepository;

impl TranslationRepository {
    /// Find the row for (parent, language) or create it with the given
    /// defaults. Returns the row and whether it was created.
    #[instrument(name = "i18n-find-or-create", skip_all)]
    pub async fn find_or_create<C: ConnectionTrait>(
        conn: &C,
        unit: &TranslationUnit,
        parent_id: i64,
        language: &LanguageId,
        defaults: &Map<String, JsonValue>,
    ) -> I18nResult<(TranslationRow, bool)> {
        if let Some(row) = Self::find_one(conn, unit, parent_id, language).await? {
            return Ok((row, false));
        }
        Self::insert(conn, unit, parent_id, language, defaults).await?;
        let row = Self::find_one(conn, unit, parent_id, language)
            .await?
            .ok_or_else(|| StorageError::EntityNotFound(unit.table().to_owned()))?;
        Ok((row, true))
    }

    /// Check-then-write upsert keyed on (parent_id, language_id).
    ///
    /// Only the given columns of an existing row change; a new row holds the
    /// given columns and nulls elsewhere.
    #[instrument(name = "i18n-upsert", skip_all)]
    pub async fn upsert<C: ConnectionTrait>(
        conn: &C,
        unit: &TranslationUnit,
        parent_id: i64,
        language: &LanguageId,
        values: &Map<String, JsonValue>,
    ) -> I18nResult<UpsertOutcome> {
        match Self::find_one(conn, unit, parent_id, language).await? {
            Some(_) => {
                let mut stmt = Query::update();
                stmt.table(Alias::new(unit.table()));
                for (name, value) in values {
                    stmt.value(Alias::new(name.as_str()), Self::bind(unit, name, value)?);
                }
                stmt.and_where(Expr::col(Alias::new(PARENT_ID_COL)).eq(parent_id))
                    .and_where(
                        Expr::col(Alias::new(LANGUAGE_ID_COL)).eq(language.as_db_value()),
                    );

                let backend = conn.get_database_backend();
                conn.execute(backend.build(&stmt)).await?;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                Self::insert(conn, unit, parent_id, language, values).await?;
                Ok(UpsertOutcome::Created)
            }
        }
    }

    /// Bulk delete of every row belonging to a parent. Returns the count.
    pub async fn delete_by_parent<C: ConnectionTrait>(
        conn: &C,
        unit: &TranslationUnit,
        parent_id: i64,
    ) -> I18nResult<u64> {
        let mut stmt = Query::delete();
        stmt.from_table(Alias::new(unit.table()))
            .and_where(Expr::col(Alias::new(PARENT_ID_COL)).eq(parent_id));

        let backend = conn.get_database_backend();
        let result = conn.execute(backend.build(&stmt)).await?;
        Ok(result.rows_affected())
    }

    /// Translation rows for a set of parents, keyed by parent id and
    /// optionally restricted to one language. The synthetic id and parent_id
    /// columns never appear in the returned values.
    pub async fn find_by_parents<C: ConnectionTrait>(
        conn: &C,
        unit: &TranslationUnit,
        parents: &[i64],
        language: Option<&LanguageId>,
    ) -> I18nResult<Vec<(i64, TranslationRow)>> {
        if parents.is_empty() {
            return Ok(Vec::new());
        }
        let mut stmt = Self::select(unit);
        stmt.column(Alias::new(PARENT_ID_COL))
            .and_where(Expr::col(Alias::new(PARENT_ID_COL)).is_in(parents.iter().copied()));
        if let Some(language) = language {
            stmt.and_where(Expr::col(Alias::new(LANGUAGE_ID_COL)).eq(language.as_db_value()));
        }

        let backend = conn.get_database_backend();
        let rows = conn.query_all(backend.build(&stmt)).await?;
        rows.iter()
            .map(|row| {
                let parent: i64 = row.try_get("", PARENT_ID_COL)?;
                Ok((parent, Self::decode(unit, row)?))
            })
            .collect()
    }

    async fn find_one<C: ConnectionTrait>(
        conn: &C,
        unit: &TranslationUnit,
        parent_id: i64,
        language: &LanguageId,
    ) -> I18nResult<Option<TranslationRow>> {
        let mut stmt = Self::select(unit);
        stmt.and_where(Expr::col(Alias::new(PARENT_ID_COL)).eq(parent_id))
            .and_where(Expr::col(Alias::new(LANGUAGE_ID_COL)).eq(language.as_db_value()));

        let backend = conn.get_database_backend();
        let row = conn.query_one(backend.build(&stmt)).await?;
        row.map(|row| Self::decode(unit, &row)).transpose()
    }

    async fn insert<C: ConnectionTrait>(
        conn: &C,
        unit: &TranslationUnit,
        parent_id: i64,
        language: &LanguageId,
        values: &Map<String, JsonValue>,
    ) -> I18nResult<()> {
        let mut columns = vec![Alias::new(PARENT_ID_COL), Alias::new(LANGUAGE_ID_COL)];
        let mut binds: Vec<SimpleExpr> =
            vec![Value::from(parent_id).into(), language.as_db_value().into()];
        for (name, value) in values {
            // Key columns are owned by the plugin, whatever the payload says.
            if name == ID_COL || name == PARENT_ID_COL || name == LANGUAGE_ID_COL {
                continue;
            }
            columns.push(Alias::new(name.as_str()));
            binds.push(Self::bind(unit, name, value)?.into());
        }

        let mut stmt = Query::insert();
        stmt.into_table(Alias::new(unit.table())).columns(columns);
        stmt.values(binds)
            .map_err(|e| StorageError::Statement(e.to_string()))?;

        let backend = conn.get_database_backend();
        conn.execute(backend.build(&stmt)).await?;
        Ok(())
    }

    fn bind(unit: &TranslationUnit, name: &str, value: &JsonValue) -> I18nResult<Value> {
        let field = unit.field_def(name).ok_or_else(|| {
            StorageError::Statement(format!(
                "unknown translation column on {}: {name}",
                unit.table()
            ))
        })?;
        to_db_value(field.kind, value)
    }

    fn select(unit: &TranslationUnit) -> SelectStatement {
        let mut stmt = Query::select();
        stmt.column(Alias::new(LANGUAGE_ID_COL));
        for field in unit.localized_fields() {
            stmt.column(Alias::new(field.name.as_str()));
        }
        stmt.from(Alias::new(unit.table()));
        stmt
    }

    fn decode(unit: &TranslationUnit, row: &QueryResult) -> I18nResult<TranslationRow> {
        let language_id = match unit.language_kind() {
            LanguageKind::Text => LanguageId::Code(row.try_get("", LANGUAGE_ID_COL)?),
            LanguageKind::Integer => LanguageId::Num(row.try_get("", LANGUAGE_ID_COL)?),
        };
        let mut values = Map::new();
        for field in unit.localized_fields() {
            values.insert(
                field.name.clone(),
                from_query_result(row, &field.name, field.kind)?,
            );
        }
        Ok(TranslationRow {
            language_id,
            values,
        })
    }
}
