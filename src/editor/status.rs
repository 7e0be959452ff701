use serde::Serialize;
use tokio::time::Instant;

use crate::models::settings::SettingsRecord;

pub const SAVE_SUCCESS_MESSAGE: &str = "Settings saved successfully!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorStatus {
    pub saving: bool,
    pub message: Option<String>,
    pub media_picker_open: bool,
}

/// Result of a save request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(SettingsRecord),
    /// Another save was still in flight; nothing was written.
    AlreadySaving,
}

/// The transient confirmation shown after a save.
#[derive(Debug, Clone)]
pub(crate) struct SaveMessage {
    pub text: String,
    pub expires_at: Instant,
}

impl SaveMessage {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
