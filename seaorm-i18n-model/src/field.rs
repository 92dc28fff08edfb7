//! Runtime schema descriptions for base entities.
//!
//! Entities handled by the plugin are described as data rather than derived
//! types: translation tables only come into existence at registration time,
//! so their DDL and row values must be assembled from these descriptions.

use sea_orm_migration::{
    prelude::*,
    schema::{
        big_integer, big_integer_null, boolean, boolean_null, double, double_null, integer,
        integer_null, json_binary, json_binary_null, pk_auto, string, string_null, timestamp,
        timestamp_null,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Column type of a dynamically described field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    BigInteger,
    Double,
    Boolean,
    Json,
    Timestamp,
}

/// One column of a runtime-described entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default = "FieldDef::nullable_default")]
    pub nullable: bool,
}

impl FieldDef {
    fn nullable_default() -> bool {
        true
    }

    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: true,
        }
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub(crate) fn column_def(&self) -> ColumnDef {
        column_def(&self.name, self.kind, self.nullable)
    }
}

pub(crate) fn column_def(name: &str, kind: FieldKind, nullable: bool) -> ColumnDef {
    let col = Alias::new(name);
    match (kind, nullable) {
        (FieldKind::Text, true) => string_null(col),
        (FieldKind::Text, false) => string(col),
        (FieldKind::Integer, true) => integer_null(col),
        (FieldKind::Integer, false) => integer(col),
        (FieldKind::BigInteger, true) => big_integer_null(col),
        (FieldKind::BigInteger, false) => big_integer(col),
        (FieldKind::Double, true) => double_null(col),
        (FieldKind::Double, false) => double(col),
        (FieldKind::Boolean, true) => boolean_null(col),
        (FieldKind::Boolean, false) => boolean(col),
        (FieldKind::Json, true) => json_binary_null(col),
        (FieldKind::Json, false) => json_binary(col),
        (FieldKind::Timestamp, true) => timestamp_null(col),
        (FieldKind::Timestamp, false) => timestamp(col),
    }
}

/// Equality filter on one base-entity column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeFilter {
    pub field: String,
    pub value: JsonValue,
}

/// A user-declared named scope: a reusable set of equality filters the
/// scoped finders apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedScope {
    pub name: String,
    #[serde(default)]
    pub filters: Vec<ScopeFilter>,
}

impl NamedScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, field: impl Into<String>, value: JsonValue) -> Self {
        self.filters.push(ScopeFilter {
            field: field.into(),
            value,
        });
        self
    }
}

/// Runtime description of a base entity's schema.
///
/// Fields destined for translation are named in `localized`, an explicit
/// list rather than a marker buried in a column descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDef {
    pub name: String,

    /// Overrides the registry-wide primary key column for this entity.
    #[serde(default)]
    pub primary_key: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldDef>,

    /// Names of the fields whose values live in the translation table.
    #[serde(default)]
    pub localized: Vec<String>,

    #[serde(default)]
    pub scopes: Vec<NamedScope>,
}

impl EntityDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: None,
            fields: Vec::new(),
            localized: Vec::new(),
            scopes: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn localized<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.localized = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn scope(mut self, scope: NamedScope) -> Self {
        self.scopes.push(scope);
        self
    }

    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_def(name).is_some()
    }

    /// Split the fields into (universal, localized) per the localized list.
    pub fn partition_fields(&self) -> (Vec<&FieldDef>, Vec<&FieldDef>) {
        self.fields
            .iter()
            .partition(|field| !self.localized.iter().any(|name| name == &field.name))
    }

    /// DDL for the base table itself.
    pub fn to_create_table_stmt(&self, primary_key: &str) -> TableCreateStatement {
        let mut table = Table::create();
        table
            .table(Alias::new(self.name.as_str()))
            .if_not_exists()
            .col(pk_auto(Alias::new(primary_key)));
        for field in &self.fields {
            table.col(field.column_def());
        }
        table.to_owned()
    }

    pub fn to_drop_table_stmt(&self) -> TableDropStatement {
        Table::drop()
            .table(Alias::new(self.name.as_str()))
            .if_exists()
            .to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> EntityDef {
        EntityDef::new("product")
            .field(FieldDef::new("label", FieldKind::Text))
            .field(FieldDef::new("reference", FieldKind::Text))
            .localized(["label"])
    }

    #[test]
    fn partition_splits_localized_from_universal() {
        let def = product();
        let (universal, localized) = def.partition_fields();
        assert_eq!(universal.len(), 1);
        assert_eq!(universal[0].name, "reference");
        assert_eq!(localized.len(), 1);
        assert_eq!(localized[0].name, "label");
    }

    #[test]
    fn partition_without_localized_list_keeps_everything_universal() {
        let def = EntityDef::new("category").field(FieldDef::new("name", FieldKind::Text));
        let (universal, localized) = def.partition_fields();
        assert_eq!(universal.len(), 1);
        assert!(localized.is_empty());
    }
}
