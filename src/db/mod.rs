pub mod media;
pub mod settings;

use sqlx::PgPool;

pub use media::PgMediaCatalog;
pub use settings::PgSettingsStore;

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
