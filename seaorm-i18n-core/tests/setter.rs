mod common;

use common::{lang, options, product_values, registry, registry_with, setup};
use seaorm_i18n_core::{CreateOptions, EntityClient, GetI18nOptions, UpsertOutcome};
use seaorm_i18n_model::{EntityDef, FieldDef, FieldKind, I18n, I18nOptions, LanguageId};
use serde_json::json;

#[tokio::test]
async fn set_then_reload_round_trips_through_get() {
    let i18n = registry();
    let db = setup(&i18n).await;
    let client = EntityClient::new(&i18n, "product").unwrap();

    let instance = client
        .create(
            &db,
            product_values(1, "test", "random"),
            CreateOptions::default(),
        )
        .await
        .unwrap();

    let outcome = instance
        .set_i18n(&i18n, &db, Some(lang("EN")), "label", json!("test-en-update"))
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Created);

    // The setter does not refresh the in-memory instance.
    let mut stale = instance.clone();
    stale.get_i18n(&i18n, &lang("EN"), GetI18nOptions::default());
    assert_ne!(stale.get("label"), Some(&json!("test-en-update")));

    let mut fresh = client.find_by_id(&db, 1).await.unwrap().unwrap();
    fresh.get_i18n(&i18n, &lang("EN"), GetI18nOptions::default());
    assert_eq!(fresh.get("label"), Some(&json!("test-en-update")));

    // The default language's row is unaffected.
    let mut fresh = client.find_by_id(&db, 1).await.unwrap().unwrap();
    fresh.get_i18n(&i18n, &lang("FR"), GetI18nOptions::default());
    assert_eq!(fresh.get("label"), Some(&json!("test")));
}

#[tokio::test]
async fn second_write_for_the_same_language_updates_in_place() {
    let i18n = registry();
    let db = setup(&i18n).await;
    let client = EntityClient::new(&i18n, "product").unwrap();

    let instance = client
        .create(
            &db,
            product_values(1, "test", "random"),
            CreateOptions::default(),
        )
        .await
        .unwrap();

    let first = instance
        .set_i18n(&i18n, &db, Some(lang("EN")), "label", json!("one"))
        .await
        .unwrap();
    let second = instance
        .set_i18n(&i18n, &db, Some(lang("EN")), "label", json!("two"))
        .await
        .unwrap();
    assert_eq!(first, UpsertOutcome::Created);
    assert_eq!(second, UpsertOutcome::Updated);

    let mut fresh = client.find_by_id(&db, 1).await.unwrap().unwrap();
    fresh.get_i18n(&i18n, &lang("EN"), GetI18nOptions::default());
    assert_eq!(fresh.get("label"), Some(&json!("two")));
}

#[tokio::test]
async fn missing_language_without_a_default_is_an_argument_error() {
    let plain = registry_with(I18nOptions::new(vec![
        LanguageId::from("FR"),
        LanguageId::from("EN"),
        LanguageId::from("ES"),
    ]));
    let db = setup(&plain).await;
    let client = EntityClient::new(&plain, "product").unwrap();

    let instance = client
        .create(
            &db,
            product_values(1, "test", "random"),
            CreateOptions {
                language_id: Some(lang("FR")),
            },
        )
        .await
        .unwrap();

    let result = instance
        .set_i18n(&plain, &db, None, "label", json!("x"))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn missing_language_falls_back_to_the_default() {
    let i18n = registry();
    let db = setup(&i18n).await;
    let client = EntityClient::new(&i18n, "product").unwrap();

    let instance = client
        .create(
            &db,
            product_values(1, "test", "random"),
            CreateOptions::default(),
        )
        .await
        .unwrap();

    let outcome = instance
        .set_i18n(&i18n, &db, None, "label", json!("test-fr"))
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Updated);

    let mut fresh = client.find_by_id(&db, 1).await.unwrap().unwrap();
    fresh.get_i18n(&i18n, &lang("FR"), GetI18nOptions::default());
    assert_eq!(fresh.get("label"), Some(&json!("test-fr")));
}

#[tokio::test]
async fn missing_property_name_is_an_argument_error() {
    let i18n = registry();
    let db = setup(&i18n).await;
    let client = EntityClient::new(&i18n, "product").unwrap();

    let instance = client
        .create(
            &db,
            product_values(1, "test", "random"),
            CreateOptions::default(),
        )
        .await
        .unwrap();

    let result = instance
        .set_i18n(&i18n, &db, Some(lang("EN")), "", json!("x"))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn unknown_language_is_rejected() {
    let i18n = registry();
    let db = setup(&i18n).await;
    let client = EntityClient::new(&i18n, "product").unwrap();

    let instance = client
        .create(
            &db,
            product_values(1, "test", "random"),
            CreateOptions::default(),
        )
        .await
        .unwrap();

    let result = instance
        .set_i18n(&i18n, &db, Some(lang("DE")), "label", json!("x"))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn setter_leaves_other_columns_of_the_row_untouched() {
    let mut i18n = I18n::new(options()).unwrap();
    i18n.define_entity(
        EntityDef::new("article")
            .field(FieldDef::new("title", FieldKind::Text))
            .field(FieldDef::new("body", FieldKind::Text))
            .localized(["title", "body"]),
    )
    .unwrap();
    let db = setup(&i18n).await;
    let client = EntityClient::new(&i18n, "article").unwrap();

    let mut values = serde_json::Map::new();
    values.insert("title".to_owned(), json!("t"));
    values.insert("body".to_owned(), json!("b"));
    let instance = client
        .create(&db, values, CreateOptions::default())
        .await
        .unwrap();

    instance
        .set_i18n(&i18n, &db, Some(lang("FR")), "title", json!("t2"))
        .await
        .unwrap();

    let mut fresh = client.find_by_id(&db, instance.id()).await.unwrap().unwrap();
    fresh.get_i18n(&i18n, &lang("FR"), GetI18nOptions::default());
    assert_eq!(fresh.get("title"), Some(&json!("t2")));
    assert_eq!(fresh.get("body"), Some(&json!("b")));
}
