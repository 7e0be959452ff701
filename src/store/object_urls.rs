use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::core::AppError;

pub const OBJECT_URL_PREFIX: &str = "/api/v1/media/blob/";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ObjectUrlError {
    #[error("Object URL not found: {0}")]
    NotFound(Uuid),
    #[error("Object URL registry lock poisoned")]
    Poisoned,
}

impl From<ObjectUrlError> for AppError {
    fn from(error: ObjectUrlError) -> Self {
        match error {
            ObjectUrlError::NotFound(_) => AppError::not_found(error),
            ObjectUrlError::Poisoned => AppError::internal_error(error),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Transient, revocable URLs for uploaded files, served from memory.
///
/// Entries live until revoked or the process exits.
#[derive(Default)]
pub struct ObjectUrlRegistry {
    objects: RwLock<HashMap<Uuid, StoredObject>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url_for(id: Uuid) -> String {
        format!("{}{}", OBJECT_URL_PREFIX, id)
    }

    /// Store `bytes` and return the id together with its URL.
    pub fn create(
        &self,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<(Uuid, String), ObjectUrlError> {
        let id = Uuid::new_v4();
        let object = StoredObject {
            content_type: content_type.into(),
            bytes,
        };
        self.objects
            .write()
            .map_err(|_| ObjectUrlError::Poisoned)?
            .insert(id, object);
        Ok((id, Self::url_for(id)))
    }

    pub fn get(&self, id: Uuid) -> Result<StoredObject, ObjectUrlError> {
        self.objects
            .read()
            .map_err(|_| ObjectUrlError::Poisoned)?
            .get(&id)
            .cloned()
            .ok_or(ObjectUrlError::NotFound(id))
    }

    pub fn revoke(&self, id: Uuid) -> Result<(), ObjectUrlError> {
        self.objects
            .write()
            .map_err(|_| ObjectUrlError::Poisoned)?
            .remove(&id)
            .map(|_| ())
            .ok_or(ObjectUrlError::NotFound(id))
    }

    pub fn len(&self) -> Result<usize, ObjectUrlError> {
        Ok(self
            .objects
            .read()
            .map_err(|_| ObjectUrlError::Poisoned)?
            .len())
    }

    pub fn is_empty(&self) -> Result<bool, ObjectUrlError> {
        Ok(self.len()? == 0)
    }
}
