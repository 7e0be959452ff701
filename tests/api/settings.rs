use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use site_settings::core::config::StorageBackend;
use site_settings::core::AppError;
use site_settings::models::settings::SettingsRecord;
use site_settings::site_settings_web_server::Backends;
use site_settings::store::{InMemoryMediaCatalog, InMemorySettingsStore, SettingsStore};
use tokio::sync::Notify;

use crate::helpers::{spawn_app, spawn_app_from_config, spawn_app_with, test_config};

struct UnavailableStore;

#[async_trait]
impl SettingsStore for UnavailableStore {
    async fn read(&self) -> Result<Option<SettingsRecord>, AppError> {
        Err(AppError::db_error("database is unavailable"))
    }

    async fn write(&self, _record: &SettingsRecord) -> Result<(), AppError> {
        Err(AppError::db_error("database is unavailable"))
    }
}

#[derive(Default)]
struct GatedStore {
    inner: InMemorySettingsStore,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl SettingsStore for GatedStore {
    async fn read(&self) -> Result<Option<SettingsRecord>, AppError> {
        self.inner.read().await
    }

    async fn write(&self, record: &SettingsRecord) -> Result<(), AppError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.write(record).await
    }
}

#[tokio::test]
async fn settings_default_to_empty_record_when_nothing_saved() {
    let app = spawn_app().await;

    let body = app.get_json("/settings").await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["siteName"], "");
    assert_eq!(body["data"]["contactInfo"]["email"], "");
    assert_eq!(body["data"]["contactInfo"]["socialLinks"], json!({}));
    assert_eq!(body["data"]["seoDefaults"]["title"], "");
}

#[tokio::test]
async fn field_edits_are_only_persisted_on_save() {
    let app = spawn_app().await;

    for (field, value) in [
        ("siteName", "Acme"),
        ("contactInfo.email", "a@b.com"),
        ("contactInfo.phone", "+1 555 0100"),
        ("seoDefaults.title", "Acme | Home"),
    ] {
        let response = app
            .patch_json("/admin/settings/fields", &json!({ "field": field, "value": value }))
            .await;
        assert_eq!(response.status().as_u16(), 200, "field {}", field);
    }

    let persisted = app.get_json("/settings").await;
    assert_eq!(persisted["data"]["siteName"], "");

    let response = app.save().await;
    assert_eq!(response.status().as_u16(), 200);

    let persisted = app.get_json("/settings").await;
    let draft = app.get_json("/admin/settings").await;
    assert_eq!(persisted["data"], draft["data"]);
    assert_eq!(persisted["data"]["siteName"], "Acme");
    assert_eq!(persisted["data"]["contactInfo"]["phone"], "+1 555 0100");
    assert_eq!(persisted["data"]["seoDefaults"]["title"], "Acme | Home");
}

#[tokio::test]
async fn unknown_field_path_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .patch_json(
            "/admin/settings/fields",
            &json!({ "field": "contactInfo.fax", "value": "555" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Unknown settings field: contactInfo.fax");
}

#[tokio::test]
async fn social_link_edit_keeps_contact_email() {
    let app = spawn_app().await;
    app.patch_json(
        "/admin/settings/edits",
        &json!({ "field": "contactEmail", "value": "a@b.com" }),
    )
    .await;

    let response = app
        .put_json(
            "/admin/settings/social-links/twitter",
            &json!({ "value": "https://twitter.com/acme" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["data"]["contactInfo"]["socialLinks"],
        json!({ "twitter": "https://twitter.com/acme" })
    );
    assert_eq!(body["data"]["contactInfo"]["email"], "a@b.com");
}

#[tokio::test]
async fn unknown_social_platform_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .put_json("/admin/settings/social-links/myspace", &json!({ "value": "x" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn invalid_contact_info_json_keeps_last_valid_value() {
    let app = spawn_app().await;

    let response = app
        .put_text(
            "/admin/settings/contact-info/json",
            r#"{ "email": "hello@acme.test", "socialLinks": { "instagram": "https://instagram.com/acme" } }"#,
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .put_text("/admin/settings/contact-info/json", r#"{ "email": "#)
        .await;
    assert_eq!(response.status().as_u16(), 400);

    let draft = app.get_json("/admin/settings").await;
    assert_eq!(draft["data"]["contactInfo"]["email"], "hello@acme.test");
    assert_eq!(
        draft["data"]["contactInfo"]["socialLinks"]["instagram"],
        "https://instagram.com/acme"
    );
}

#[tokio::test]
async fn seo_defaults_json_replaces_the_object() {
    let app = spawn_app().await;

    let response = app
        .put_text(
            "/admin/settings/seo-defaults/json",
            r#"{ "title": "Acme", "description": "We make things" }"#,
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["data"]["seoDefaults"],
        json!({ "title": "Acme", "description": "We make things" })
    );
}

#[tokio::test]
async fn save_shows_success_message_in_status() {
    let app = spawn_app().await;

    let status = app.get_json("/admin/settings/status").await;
    assert_eq!(status["data"]["message"], serde_json::Value::Null);

    let response = app.save().await;
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Settings saved successfully!");

    let status = app.get_json("/admin/settings/status").await;
    assert_eq!(status["data"]["saving"], false);
    assert_eq!(status["data"]["message"], "Settings saved successfully!");
}

#[tokio::test]
async fn failed_load_and_save_keep_the_editor_usable() {
    let app = spawn_app_with(Backends {
        settings_store: Arc::new(UnavailableStore),
        media_catalog: Arc::new(InMemoryMediaCatalog::new()),
        pool: None,
    })
    .await;

    let draft = app.get_json("/admin/settings").await;
    assert_eq!(draft["data"]["siteName"], "");

    app.patch_json(
        "/admin/settings/fields",
        &json!({ "field": "siteName", "value": "Acme" }),
    )
    .await;

    let response = app.save().await;
    assert_eq!(response.status().as_u16(), 500);

    let status = app.get_json("/admin/settings/status").await;
    assert_eq!(status["data"]["saving"], false);
    assert_eq!(status["data"]["message"], serde_json::Value::Null);

    let draft = app.get_json("/admin/settings").await;
    assert_eq!(draft["data"]["siteName"], "Acme");
}

#[tokio::test]
async fn unreachable_database_at_startup_serves_defaults() {
    let mut configuration = test_config();
    configuration.storage.backend = StorageBackend::Postgres;
    configuration.storage.run_migrations = true;
    configuration.postgres.port = 1;

    let app = spawn_app_from_config(configuration).await;

    let draft = app.get_json("/admin/settings").await;
    assert_eq!(draft["success"], true);
    assert_eq!(draft["data"]["siteName"], "");
    assert_eq!(draft["data"]["logo"], "");
    assert_eq!(draft["data"]["contactInfo"]["socialLinks"], json!({}));

    let response = app.save().await;
    assert_eq!(response.status().as_u16(), 500);

    let status = app.get_json("/admin/settings/status").await;
    assert_eq!(status["data"]["saving"], false);
}

#[tokio::test]
async fn concurrent_save_is_refused() {
    let store = Arc::new(GatedStore::default());
    let app = spawn_app_with(Backends {
        settings_store: store.clone(),
        media_catalog: Arc::new(InMemoryMediaCatalog::new()),
        pool: None,
    })
    .await;

    let first = tokio::spawn({
        let client = app.api_client.clone();
        let url = app.url("/admin/settings/save");
        async move { client.post(url).send().await }
    });
    store.entered.notified().await;

    let status = app.get_json("/admin/settings/status").await;
    assert_eq!(status["data"]["saving"], true);

    let second = app.save().await;
    assert_eq!(second.status().as_u16(), 409);

    store.release.notify_one();
    let first = first.await.unwrap().unwrap();
    assert_eq!(first.status().as_u16(), 200);

    let status = app.get_json("/admin/settings/status").await;
    assert_eq!(status["data"]["saving"], false);
}

#[tokio::test]
async fn stored_settings_seed_the_draft() {
    let mut record = SettingsRecord::default();
    record.site_name = "Acme".into();
    record.contact_info.email = "a@b.com".into();

    let app = spawn_app_with(Backends {
        settings_store: Arc::new(InMemorySettingsStore::with_record(record)),
        media_catalog: Arc::new(InMemoryMediaCatalog::new()),
        pool: None,
    })
    .await;

    let draft = app.get_json("/admin/settings").await;
    assert_eq!(draft["data"]["siteName"], "Acme");
    assert_eq!(draft["data"]["contactInfo"]["email"], "a@b.com");
}
