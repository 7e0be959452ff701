use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::AppError;
use crate::models::settings::SettingsRecord;

/// Persistence for the single site settings record.
///
/// `write` always replaces the whole record; the last writer wins.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns `None` when nothing has been saved yet.
    async fn read(&self) -> Result<Option<SettingsRecord>, AppError>;

    async fn write(&self, record: &SettingsRecord) -> Result<(), AppError>;
}

/// Process-local store, used when `storage.backend` is `memory`.
#[derive(Default)]
pub struct InMemorySettingsStore {
    record: RwLock<Option<SettingsRecord>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SettingsRecord) -> Self {
        Self {
            record: RwLock::new(Some(record)),
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn read(&self) -> Result<Option<SettingsRecord>, AppError> {
        Ok(self.record.read().await.clone())
    }

    async fn write(&self, record: &SettingsRecord) -> Result<(), AppError> {
        *self.record.write().await = Some(record.clone());
        Ok(())
    }
}
