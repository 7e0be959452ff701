pub mod media_catalog;
pub mod object_urls;
pub mod settings_store;

pub use media_catalog::{InMemoryMediaCatalog, MediaCatalog};
pub use object_urls::{ObjectUrlError, ObjectUrlRegistry};
pub use settings_store::{InMemorySettingsStore, SettingsStore};
