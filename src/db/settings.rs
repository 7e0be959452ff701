use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::core::AppError;
use crate::models::settings::{SettingsRecord, SettingsRow};
use crate::store::SettingsStore;

pub async fn fetch_site_settings(pool: &PgPool) -> Result<Option<SettingsRow>, AppError> {
    let row = sqlx::query_as::<_, SettingsRow>(
        r#"
        SELECT
            site_name,
            logo,
            favicon,
            contact_info,
            seo_defaults,
            updated_at
        FROM site_settings
        ORDER BY updated_at DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn upsert_site_settings(pool: &PgPool, row: &SettingsRow) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO site_settings (id, site_name, logo, favicon, contact_info, seo_defaults, updated_at)
        VALUES (1, $1, $2, $3, $4, $5, now())
        ON CONFLICT (id) DO UPDATE SET
            site_name = EXCLUDED.site_name,
            logo = EXCLUDED.logo,
            favicon = EXCLUDED.favicon,
            contact_info = EXCLUDED.contact_info,
            seo_defaults = EXCLUDED.seo_defaults,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(&row.site_name)
    .bind(&row.logo)
    .bind(&row.favicon)
    .bind(Json(&row.contact_info.0))
    .bind(Json(&row.seo_defaults.0))
    .execute(pool)
    .await?;

    Ok(())
}

/// `SettingsStore` over the single-row `site_settings` table.
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn read(&self) -> Result<Option<SettingsRecord>, AppError> {
        Ok(fetch_site_settings(&self.pool).await?.map(SettingsRecord::from))
    }

    async fn write(&self, record: &SettingsRecord) -> Result<(), AppError> {
        upsert_site_settings(&self.pool, &SettingsRow::from(record)).await
    }
}
