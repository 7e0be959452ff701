use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Document,
    Other,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Document => "document",
            Self::Other => "other",
        }
    }
}

impl From<&str> for MediaType {
    fn from(value: &str) -> Self {
        match value {
            "image" => Self::Image,
            "video" => Self::Video,
            "document" => Self::Document,
            _ => Self::Other,
        }
    }
}

/// An entry of the media library.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: String,
    pub thumbnail: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct MediaRow {
    pub id: Uuid,
    pub name: String,
    pub media_type: String,
    pub url: String,
    pub thumbnail: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl From<MediaRow> for MediaItem {
    fn from(row: MediaRow) -> Self {
        MediaItem {
            id: row.id,
            name: row.name,
            media_type: MediaType::from(row.media_type.as_str()),
            url: row.url,
            thumbnail: row.thumbnail,
            size: row.size,
            uploaded_at: row.uploaded_at,
        }
    }
}

/// Body of `POST /media`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaItemRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[validate(url)]
    pub url: String,
    #[validate(url)]
    pub thumbnail: Option<String>,
    #[validate(range(min = 0))]
    pub size: i64,
}

impl NewMediaItemRequest {
    pub fn into_item(self) -> MediaItem {
        let thumbnail = self.thumbnail.unwrap_or_else(|| self.url.clone());
        MediaItem {
            id: Uuid::new_v4(),
            name: self.name,
            media_type: self.media_type,
            url: self.url,
            thumbnail,
            size: self.size,
            uploaded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MediaQuery {
    #[serde(rename = "type")]
    pub media_type: Option<MediaType>,
}
