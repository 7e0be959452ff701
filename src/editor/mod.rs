//! The admin settings editor.
//!
//! Holds a draft of the site settings while the operator edits it and
//! reconciles the draft with the [`SettingsStore`] on save. Edits are applied
//! synchronously; only loading and saving await the store.

mod logo;
mod status;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockWriteGuard};
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use crate::core::config::EditorConfig;
use crate::core::AppError;
use crate::models::media::{MediaItem, MediaType};
use crate::models::settings::{
    ContactInfo, SeoDefaults, SettingsEdit, SettingsRecord, SocialPlatform,
};
use crate::store::{MediaCatalog, ObjectUrlRegistry, SettingsStore};

pub use logo::{LogoSource, UploadedFile, INVALID_LOGO_MESSAGE};
pub use status::{EditorStatus, SaveOutcome, SAVE_SUCCESS_MESSAGE};
use status::SaveMessage;

#[derive(Debug, Clone)]
pub struct EditorOptions {
    pub save_message_ttl: Duration,
    pub max_logo_size_bytes: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        EditorOptions::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for EditorOptions {
    fn from(config: &EditorConfig) -> Self {
        Self {
            save_message_ttl: Duration::from_secs(config.save_message_ttl_secs),
            max_logo_size_bytes: config.max_logo_size_bytes,
        }
    }
}

pub struct SettingsEditor {
    store: Arc<dyn SettingsStore>,
    catalog: Arc<dyn MediaCatalog>,
    object_urls: Arc<ObjectUrlRegistry>,
    draft: RwLock<SettingsRecord>,
    saving: AtomicBool,
    save_message: Mutex<Option<SaveMessage>>,
    media_picker_open: AtomicBool,
    options: EditorOptions,
}

/// Clears the saving flag however the save ends.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::internal_error("Settings editor state is poisoned")
}

impl SettingsEditor {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        catalog: Arc<dyn MediaCatalog>,
        object_urls: Arc<ObjectUrlRegistry>,
        draft: SettingsRecord,
        options: EditorOptions,
    ) -> Self {
        Self {
            store,
            catalog,
            object_urls,
            draft: RwLock::new(draft),
            saving: AtomicBool::new(false),
            save_message: Mutex::new(None),
            media_picker_open: AtomicBool::new(false),
            options,
        }
    }

    /// Build an editor whose draft starts from the stored settings.
    ///
    /// A missing record or a failed read falls back to the default record.
    #[tracing::instrument(name = "Load settings editor", skip_all)]
    pub async fn load(
        store: Arc<dyn SettingsStore>,
        catalog: Arc<dyn MediaCatalog>,
        object_urls: Arc<ObjectUrlRegistry>,
        options: EditorOptions,
    ) -> Self {
        let draft = match store.read().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::warn!("No site settings stored yet, starting from defaults");
                SettingsRecord::default()
            }
            Err(e) => {
                tracing::error!("Failed to load site settings: {:?}", e);
                SettingsRecord::default()
            }
        };

        Self::new(store, catalog, object_urls, draft, options)
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn draft(&self) -> Result<SettingsRecord, AppError> {
        Ok(self.draft.read().map_err(poisoned)?.clone())
    }

    fn draft_mut(&self) -> Result<RwLockWriteGuard<'_, SettingsRecord>, AppError> {
        self.draft.write().map_err(poisoned)
    }

    /// The record as last persisted, or the default when nothing is stored.
    pub async fn persisted(&self) -> Result<SettingsRecord, AppError> {
        Ok(self.store.read().await?.unwrap_or_default())
    }

    pub fn apply_edit(&self, edit: SettingsEdit) -> Result<SettingsRecord, AppError> {
        let mut draft = self.draft_mut()?;
        draft.apply(edit);
        Ok(draft.clone())
    }

    /// Apply an edit addressed by form field name, e.g. `contactInfo.email`.
    pub fn apply_field_edit(
        &self,
        field_path: &str,
        value: String,
    ) -> Result<SettingsRecord, AppError> {
        let edit = SettingsEdit::from_field_path(field_path, value)
            .map_err(AppError::validation_error)?;
        self.apply_edit(edit)
    }

    pub fn apply_social_link_edit(
        &self,
        platform: SocialPlatform,
        value: String,
    ) -> Result<SettingsRecord, AppError> {
        self.apply_edit(SettingsEdit::SocialLink { platform, value })
    }

    /// Replace the contact info from hand-edited JSON text.
    ///
    /// Text that does not parse is rejected and the draft keeps its last valid value.
    pub fn apply_contact_info_json(&self, text: &str) -> Result<SettingsRecord, AppError> {
        let contact_info: ContactInfo = serde_json::from_str(text).map_err(|e| {
            tracing::warn!("Rejected contact info JSON: {}", e);
            AppError::from(e)
        })?;
        self.apply_edit(SettingsEdit::ContactInfo(contact_info))
    }

    pub fn apply_seo_defaults_json(&self, text: &str) -> Result<SettingsRecord, AppError> {
        let seo_defaults: SeoDefaults = serde_json::from_str(text).map_err(|e| {
            tracing::warn!("Rejected SEO defaults JSON: {}", e);
            AppError::from(e)
        })?;
        self.apply_edit(SettingsEdit::SeoDefaults(seo_defaults))
    }

    #[tracing::instrument(name = "Set logo", skip(self, source))]
    pub async fn set_logo(&self, source: LogoSource) -> Result<SettingsRecord, AppError> {
        match source {
            LogoSource::Upload(file) => self.upload_logo(file).await,
            LogoSource::Library(media_id) => self.select_logo(media_id).await,
            LogoSource::Clear => self.apply_edit(SettingsEdit::Logo(String::new())),
        }
    }

    async fn upload_logo(&self, file: UploadedFile) -> Result<SettingsRecord, AppError> {
        if !file.is_image() {
            tracing::warn!(
                "Rejected logo upload {} with content type {:?}",
                file.file_name,
                file.content_type
            );
            return Err(AppError::validation_error(INVALID_LOGO_MESSAGE));
        }
        if file.bytes.len() > self.options.max_logo_size_bytes {
            return Err(AppError::validation_error(format!(
                "Logo exceeds the maximum size of {} bytes",
                self.options.max_logo_size_bytes
            )));
        }

        let size = file.bytes.len() as i64;
        let (id, url) = self.object_urls.create(file.content_type, file.bytes)?;
        let item = MediaItem {
            id,
            name: file.file_name,
            media_type: MediaType::Image,
            url: url.clone(),
            thumbnail: url.clone(),
            size,
            uploaded_at: Utc::now(),
        };

        if let Err(e) = self.catalog.append(item).await {
            tracing::error!("Failed to register uploaded logo in the media catalog: {:?}", e);
            if let Err(revoke_error) = self.object_urls.revoke(id) {
                tracing::warn!("Failed to revoke object URL {}: {}", id, revoke_error);
            }
            return Err(e);
        }

        tracing::info!("Uploaded new logo as {}", url);
        self.apply_edit(SettingsEdit::Logo(url))
    }

    async fn select_logo(&self, media_id: uuid::Uuid) -> Result<SettingsRecord, AppError> {
        let item = self
            .catalog
            .get(media_id)
            .await?
            .ok_or_else(|| AppError::not_found("Media item not found"))?;

        if item.media_type != MediaType::Image {
            return Err(AppError::validation_error(INVALID_LOGO_MESSAGE));
        }

        let record = self.apply_edit(SettingsEdit::Logo(item.url))?;
        self.close_media_picker();
        Ok(record)
    }

    pub fn open_media_picker(&self) {
        self.media_picker_open.store(true, Ordering::SeqCst);
    }

    pub fn close_media_picker(&self) {
        self.media_picker_open.store(false, Ordering::SeqCst);
    }

    /// Images the picker offers, newest first.
    pub async fn media_picker_items(&self) -> Result<Vec<MediaItem>, AppError> {
        self.catalog.list(Some(MediaType::Image)).await
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    /// Write the whole draft to the store.
    ///
    /// Only one save runs at a time; a request made while another is in
    /// flight returns [`SaveOutcome::AlreadySaving`] without writing. Failed
    /// writes are not retried and leave the draft as it is.
    #[tracing::instrument(name = "Save site settings", skip(self))]
    pub async fn save(&self) -> Result<SaveOutcome, AppError> {
        if self
            .saving
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::info!("Save requested while another save is in flight");
            return Ok(SaveOutcome::AlreadySaving);
        }
        let _saving = SavingGuard(&self.saving);

        let snapshot = self.draft()?;
        match self.store.write(&snapshot).await {
            Ok(()) => {
                self.show_save_message(SAVE_SUCCESS_MESSAGE)?;
                tracing::info!("Site settings saved");
                Ok(SaveOutcome::Saved(snapshot))
            }
            Err(e) => {
                tracing::error!("Failed to save site settings: {:?}", e);
                Err(e)
            }
        }
    }

    fn show_save_message(&self, text: &str) -> Result<(), AppError> {
        let mut message = self.save_message.lock().map_err(poisoned)?;
        *message = Some(SaveMessage {
            text: text.to_string(),
            expires_at: Instant::now() + self.options.save_message_ttl,
        });
        Ok(())
    }

    pub fn status(&self) -> Result<EditorStatus, AppError> {
        let mut message = self.save_message.lock().map_err(poisoned)?;
        if message
            .as_ref()
            .map_or(false, |m| m.is_expired(Instant::now()))
        {
            *message = None;
        }

        Ok(EditorStatus {
            saving: self.is_saving(),
            message: message.as_ref().map(|m| m.text.clone()),
            media_picker_open: self.media_picker_open.load(Ordering::SeqCst),
        })
    }
}
