use crate::{
    constants::{ID_COL, LANGUAGE_ID_COL, PARENT_ID_COL, TRANSLATION_SUFFIX},
    field::{column_def, FieldDef},
    language::LanguageKind,
};
use sea_orm_migration::{
    prelude::*,
    schema::{big_integer, pk_auto, string},
};

/// Derive the translation entity name for a base entity name.
///
/// Exposed as a pure function so callers can predict the generated table
/// name without a registry at hand.
pub fn translation_entity_name(base: &str) -> String {
    format!("{base}{TRANSLATION_SUFFIX}")
}

/// Descriptor of one synthesized translation entity.
///
/// Records the base ↔ translation association plus everything needed to emit
/// the translation table's DDL and to route values between the two tables.
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    base_entity: String,
    table: String,
    language_kind: LanguageKind,
    localized: Vec<FieldDef>,
}

impl TranslationUnit {
    pub(crate) fn new(
        base_entity: &str,
        language_kind: LanguageKind,
        localized: Vec<FieldDef>,
    ) -> Self {
        Self {
            base_entity: base_entity.to_owned(),
            table: translation_entity_name(base_entity),
            language_kind,
            localized,
        }
    }

    pub fn base_entity(&self) -> &str {
        &self.base_entity
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn language_kind(&self) -> LanguageKind {
        self.language_kind
    }

    pub fn localized_fields(&self) -> &[FieldDef] {
        &self.localized
    }

    /// Whether `name` is one of the translated value columns.
    pub fn has_column(&self, name: &str) -> bool {
        self.localized.iter().any(|field| field.name == name)
    }

    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.localized.iter().find(|field| field.name == name)
    }

    /// Translation table DDL: synthetic pk, (parent_id, language_id) key and
    /// one nullable column per localized field. No timestamp columns.
    pub fn to_create_table_stmt(&self) -> TableCreateStatement {
        let mut table = Table::create();
        table
            .table(Alias::new(self.table.as_str()))
            .if_not_exists()
            .col(pk_auto(Alias::new(ID_COL)))
            .col(big_integer(Alias::new(PARENT_ID_COL)))
            .col(self.language_column());
        for field in &self.localized {
            // Always nullable: a row may carry values for a subset of the
            // translated fields.
            table.col(column_def(&field.name, field.kind, true));
        }
        table.to_owned()
    }

    fn language_column(&self) -> ColumnDef {
        let col = Alias::new(LANGUAGE_ID_COL);
        match self.language_kind {
            LanguageKind::Text => string(col),
            LanguageKind::Integer => big_integer(col),
        }
    }

    /// Unique key on (parent_id, language_id) plus a parent lookup index.
    pub fn to_create_indexes_stmt(&self) -> Vec<IndexCreateStatement> {
        vec![
            Index::create()
                .name(format!("uk_{}_parent_language", self.table))
                .table(Alias::new(self.table.as_str()))
                .col(Alias::new(PARENT_ID_COL))
                .col(Alias::new(LANGUAGE_ID_COL))
                .unique()
                .if_not_exists()
                .to_owned(),
            Index::create()
                .name(format!("idx_{}_parent", self.table))
                .table(Alias::new(self.table.as_str()))
                .col(Alias::new(PARENT_ID_COL))
                .if_not_exists()
                .to_owned(),
        ]
    }

    pub fn to_drop_table_stmt(&self) -> TableDropStatement {
        Table::drop()
            .table(Alias::new(self.table.as_str()))
            .if_exists()
            .to_owned()
    }
}
