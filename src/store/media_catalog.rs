use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::AppError;
use crate::models::media::{MediaItem, MediaType};

/// The media library as seen by the settings editor.
#[async_trait]
pub trait MediaCatalog: Send + Sync {
    /// Newest first. `filter` restricts the result to one media type.
    async fn list(&self, filter: Option<MediaType>) -> Result<Vec<MediaItem>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<MediaItem>, AppError>;

    async fn append(&self, item: MediaItem) -> Result<(), AppError>;
}

#[derive(Default)]
pub struct InMemoryMediaCatalog {
    items: RwLock<Vec<MediaItem>>,
}

impl InMemoryMediaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<MediaItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait]
impl MediaCatalog for InMemoryMediaCatalog {
    async fn list(&self, filter: Option<MediaType>) -> Result<Vec<MediaItem>, AppError> {
        let items = self.items.read().await;
        let mut listed: Vec<MediaItem> = items
            .iter()
            .filter(|item| filter.map_or(true, |media_type| item.media_type == media_type))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(listed)
    }

    async fn get(&self, id: Uuid) -> Result<Option<MediaItem>, AppError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn append(&self, item: MediaItem) -> Result<(), AppError> {
        self.items.write().await.push(item);
        Ok(())
    }
}
