use uuid::Uuid;

pub const INVALID_LOGO_MESSAGE: &str = "Please select an image file";

/// Where a new logo comes from.
#[derive(Debug, Clone)]
pub enum LogoSource {
    /// A file uploaded by the operator; becomes an object URL and a catalog entry.
    Upload(UploadedFile),
    /// An existing catalog item, assigned as-is.
    Library(Uuid),
    /// Remove the logo. The catalog is left untouched.
    Clear,
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}
