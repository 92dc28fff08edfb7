use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use seaorm_i18n_core::Schema;
use seaorm_i18n_model::{
    EntityDef, FieldDef, FieldKind, I18n, I18nOptions, LanguageId, NamedScope,
};
use serde_json::{json, Map, Value as JsonValue};
use std::sync::Once;
use tracing::Level;

pub const LANGUAGES: [&str; 3] = ["FR", "EN", "ES"];
pub const DEFAULT_LANGUAGE: &str = "FR";

static INIT_TRACING: Once = Once::new();

pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_target(false)
            .without_time()
            .try_init();
    });
}

pub fn lang(code: &str) -> LanguageId {
    LanguageId::from(code)
}

pub fn options() -> I18nOptions {
    I18nOptions::new(LANGUAGES.iter().map(|code| lang(code)).collect())
        .with_default_language(lang(DEFAULT_LANGUAGE))
}

/// Product catalog fixture: `label` is translated, `reference` is not. A
/// second `category` entity carries no localized fields at all.
pub fn registry_with(options: I18nOptions) -> I18n {
    let mut i18n = I18n::new(options).expect("options are valid");
    i18n.define_entity(
        EntityDef::new("product")
            .field(FieldDef::new("label", FieldKind::Text))
            .field(FieldDef::new("reference", FieldKind::Text))
            .localized(["label"])
            .scope(NamedScope::new("referenced").filter("reference", json!("random"))),
    )
    .expect("product definition is valid");
    i18n.define_entity(
        EntityDef::new("category").field(FieldDef::new("name", FieldKind::Text)),
    )
    .expect("category definition is valid");
    i18n
}

pub fn registry() -> I18n {
    registry_with(options())
}

pub async fn setup(i18n: &I18n) -> DatabaseConnection {
    init_tracing();
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    Schema::sync(i18n, &db).await.expect("schema sync");
    db
}

pub fn product_values(id: i64, label: &str, reference: &str) -> Map<String, JsonValue> {
    let mut values = Map::new();
    values.insert("id".to_owned(), json!(id));
    values.insert("label".to_owned(), json!(label));
    values.insert("reference".to_owned(), json!(reference));
    values
}

/// Raw row count of a translation table for one parent.
pub async fn translation_rows(db: &DatabaseConnection, table: &str, parent_id: i64) -> i64 {
    let stmt = Statement::from_string(
        db.get_database_backend(),
        format!("SELECT COUNT(*) AS cnt FROM {table} WHERE parent_id = {parent_id}"),
    );
    let row = db
        .query_one(stmt)
        .await
        .expect("count query")
        .expect("count row");
    row.try_get::<i64>("", "cnt").expect("count value")
}
