use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::AppError;
use crate::models::media::{MediaItem, MediaRow, MediaType};
use crate::store::MediaCatalog;

pub async fn list_media(
    pool: &PgPool,
    media_type: Option<MediaType>,
) -> Result<Vec<MediaItem>, AppError> {
    let rows = sqlx::query_as::<_, MediaRow>(
        r#"
        SELECT id, name, media_type, url, thumbnail, size, uploaded_at
        FROM media_items
        WHERE ($1::TEXT IS NULL OR media_type = $1)
        ORDER BY uploaded_at DESC
        "#,
    )
    .bind(media_type.map(|t| t.as_str()))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(MediaItem::from).collect())
}

pub async fn get_media(pool: &PgPool, id: Uuid) -> Result<Option<MediaItem>, AppError> {
    let row = sqlx::query_as::<_, MediaRow>(
        r#"
        SELECT id, name, media_type, url, thumbnail, size, uploaded_at
        FROM media_items
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(MediaItem::from))
}

pub async fn insert_media(pool: &PgPool, item: &MediaItem) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO media_items (id, name, media_type, url, thumbnail, size, uploaded_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(item.id)
    .bind(&item.name)
    .bind(item.media_type.as_str())
    .bind(&item.url)
    .bind(&item.thumbnail)
    .bind(item.size)
    .bind(item.uploaded_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub struct PgMediaCatalog {
    pool: PgPool,
}

impl PgMediaCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaCatalog for PgMediaCatalog {
    async fn list(&self, filter: Option<MediaType>) -> Result<Vec<MediaItem>, AppError> {
        list_media(&self.pool, filter).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<MediaItem>, AppError> {
        get_media(&self.pool, id).await
    }

    async fn append(&self, item: MediaItem) -> Result<(), AppError> {
        insert_media(&self.pool, &item).await
    }
}
