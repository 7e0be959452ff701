use crate::core::config::{BrandingConfig, StorageBackend};
use crate::core::AppConfig;
use crate::db::{run_migrations, PgMediaCatalog, PgSettingsStore};
use crate::editor::{EditorOptions, SettingsEditor};
use crate::routes::site_settings_routes;
use crate::store::{
    InMemoryMediaCatalog, InMemorySettingsStore, MediaCatalog, ObjectUrlRegistry, SettingsStore,
};
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{dev::Server, web::Data, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

/// The collaborators the settings editor is built on.
///
/// Created once at startup and handed to the editor explicitly.
pub struct Backends {
    pub settings_store: Arc<dyn SettingsStore>,
    pub media_catalog: Arc<dyn MediaCatalog>,
    pub pool: Option<PgPool>,
}

impl Backends {
    pub fn in_memory() -> Self {
        Self {
            settings_store: Arc::new(InMemorySettingsStore::new()),
            media_catalog: Arc::new(InMemoryMediaCatalog::new()),
            pool: None,
        }
    }

    pub async fn from_config(configuration: &AppConfig) -> Result<Self, anyhow::Error> {
        match configuration.storage.backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory settings storage");
                Ok(Self::in_memory())
            }
            StorageBackend::Postgres => {
                let pool = PgPoolOptions::new()
                    .acquire_timeout(std::time::Duration::from_secs(5))
                    .connect_lazy_with(configuration.postgres.connect());

                // Startup continues without a reachable database; the editor
                // then starts from the default record.
                if configuration.storage.run_migrations {
                    if let Err(e) = run_migrations(&pool).await {
                        tracing::error!("Failed to run database migrations: {:?}", e);
                    }
                }

                Ok(Self {
                    settings_store: Arc::new(PgSettingsStore::new(pool.clone())),
                    media_catalog: Arc::new(PgMediaCatalog::new(pool.clone())),
                    pool: Some(pool),
                })
            }
        }
    }
}

pub struct SiteSettingsWebServer {
    port: u16,
    server: Server,
    pool: Option<PgPool>,
}

impl SiteSettingsWebServer {
    pub async fn build(configuration: AppConfig) -> Result<Self, anyhow::Error> {
        let backends = Backends::from_config(&configuration).await?;
        Self::build_with(configuration, backends).await
    }

    pub async fn build_with(
        configuration: AppConfig,
        backends: Backends,
    ) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );

        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let object_urls = Arc::new(ObjectUrlRegistry::new());
        let editor = SettingsEditor::load(
            backends.settings_store,
            backends.media_catalog.clone(),
            object_urls.clone(),
            EditorOptions::from(&configuration.editor),
        )
        .await;

        let server = run(
            listener,
            editor,
            backends.media_catalog,
            object_urls,
            configuration.branding,
        )
        .await?;

        Ok(Self {
            port,
            server,
            pool: backends.pool,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        let outcome = self.server.await;
        if let Some(pool) = self.pool {
            pool.close().await;
            tracing::info!("Database pool closed");
        }
        outcome
    }
}

pub async fn run(
    listener: TcpListener,
    editor: SettingsEditor,
    media_catalog: Arc<dyn MediaCatalog>,
    object_urls: Arc<ObjectUrlRegistry>,
    branding: BrandingConfig,
) -> Result<Server, anyhow::Error> {
    let editor = Data::new(editor);
    let media_catalog: Data<dyn MediaCatalog> = Data::from(media_catalog);
    let object_urls = Data::from(object_urls);
    let branding = Data::new(branding);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allowed_headers(vec![
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
            ])
            .supports_credentials();
        App::new()
            .configure(site_settings_routes)
            .app_data(editor.clone())
            .app_data(media_catalog.clone())
            .app_data(object_urls.clone())
            .app_data(branding.clone())
            .wrap(cors)
            .wrap(TracingLogger::default())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
