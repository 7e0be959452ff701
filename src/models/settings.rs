use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use std::fmt;
use std::str::FromStr;

/// Site-wide metadata edited from the admin settings page.
///
/// `contact_info` and `seo_defaults` are always present; inputs that omit them
/// deserialize to empty objects.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub favicon: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub seo_defaults: SeoDefaults,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub social_links: SocialLinks,
}

/// Links to the site's social profiles. Empty links are absent.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SocialLinks {
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub linkedin: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub twitter: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub facebook: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub instagram: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|link| !link.is_empty()))
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SeoDefaults {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Linkedin,
    Twitter,
    Facebook,
    Instagram,
}

impl SocialPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocialPlatform {
    type Err = FieldPathError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "linkedin" => Ok(Self::Linkedin),
            "twitter" => Ok(Self::Twitter),
            "facebook" => Ok(Self::Facebook),
            "instagram" => Ok(Self::Instagram),
            other => Err(FieldPathError::UnknownPlatform(other.to_string())),
        }
    }
}

impl SocialLinks {
    pub fn get(&self, platform: SocialPlatform) -> Option<&str> {
        match platform {
            SocialPlatform::Linkedin => self.linkedin.as_deref(),
            SocialPlatform::Twitter => self.twitter.as_deref(),
            SocialPlatform::Facebook => self.facebook.as_deref(),
            SocialPlatform::Instagram => self.instagram.as_deref(),
        }
    }

    /// An empty value removes the link.
    pub fn set(&mut self, platform: SocialPlatform, value: String) {
        let value = if value.is_empty() { None } else { Some(value) };
        let slot = match platform {
            SocialPlatform::Linkedin => &mut self.linkedin,
            SocialPlatform::Twitter => &mut self.twitter,
            SocialPlatform::Facebook => &mut self.facebook,
            SocialPlatform::Instagram => &mut self.instagram,
        };
        *slot = value;
    }
}

/// A single change to the settings draft.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum SettingsEdit {
    SiteName(String),
    Logo(String),
    Favicon(String),
    ContactEmail(String),
    ContactPhone(String),
    ContactAddress(String),
    SocialLink {
        platform: SocialPlatform,
        value: String,
    },
    SeoTitle(String),
    SeoDescription(String),
    ContactInfo(ContactInfo),
    SeoDefaults(SeoDefaults),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldPathError {
    #[error("Unknown settings field: {0}")]
    UnknownField(String),
    #[error("Unknown social platform: {0}")]
    UnknownPlatform(String),
}

impl SettingsEdit {
    /// Resolve a form field name such as `siteName`, `contactInfo.email` or
    /// `contactInfo.socialLinks.twitter`.
    pub fn from_field_path(path: &str, value: String) -> Result<Self, FieldPathError> {
        let mut segments = path.splitn(3, '.');
        let edit = match (segments.next(), segments.next(), segments.next()) {
            (Some("siteName"), None, None) => Self::SiteName(value),
            (Some("logo"), None, None) => Self::Logo(value),
            (Some("favicon"), None, None) => Self::Favicon(value),
            (Some("contactInfo"), Some("email"), None) => Self::ContactEmail(value),
            (Some("contactInfo"), Some("phone"), None) => Self::ContactPhone(value),
            (Some("contactInfo"), Some("address"), None) => Self::ContactAddress(value),
            (Some("contactInfo"), Some("socialLinks"), Some(platform)) => Self::SocialLink {
                platform: platform.parse()?,
                value,
            },
            (Some("seoDefaults"), Some("title"), None) => Self::SeoTitle(value),
            (Some("seoDefaults"), Some("description"), None) => Self::SeoDescription(value),
            _ => return Err(FieldPathError::UnknownField(path.to_string())),
        };
        Ok(edit)
    }
}

impl SettingsRecord {
    pub fn apply(&mut self, edit: SettingsEdit) {
        match edit {
            SettingsEdit::SiteName(value) => self.site_name = value,
            SettingsEdit::Logo(value) => self.logo = value,
            SettingsEdit::Favicon(value) => self.favicon = value,
            SettingsEdit::ContactEmail(value) => self.contact_info.email = value,
            SettingsEdit::ContactPhone(value) => self.contact_info.phone = value,
            SettingsEdit::ContactAddress(value) => self.contact_info.address = value,
            SettingsEdit::SocialLink { platform, value } => {
                self.contact_info.social_links.set(platform, value)
            }
            SettingsEdit::SeoTitle(value) => self.seo_defaults.title = value,
            SettingsEdit::SeoDescription(value) => self.seo_defaults.description = value,
            SettingsEdit::ContactInfo(contact_info) => self.contact_info = contact_info,
            SettingsEdit::SeoDefaults(seo_defaults) => self.seo_defaults = seo_defaults,
        }
    }

    pub fn with_edit(mut self, edit: SettingsEdit) -> Self {
        self.apply(edit);
        self
    }
}

/// The single persisted settings row, keyed the way the `site_settings` table is.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct SettingsRow {
    pub site_name: String,
    pub logo: String,
    pub favicon: String,
    pub contact_info: Json<ContactInfo>,
    pub seo_defaults: Json<SeoDefaults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<SettingsRow> for SettingsRecord {
    fn from(row: SettingsRow) -> Self {
        SettingsRecord {
            site_name: row.site_name,
            logo: row.logo,
            favicon: row.favicon,
            contact_info: row.contact_info.0,
            seo_defaults: row.seo_defaults.0,
        }
    }
}

impl From<&SettingsRecord> for SettingsRow {
    fn from(record: &SettingsRecord) -> Self {
        SettingsRow {
            site_name: record.site_name.clone(),
            logo: record.logo.clone(),
            favicon: record.favicon.clone(),
            contact_info: Json(record.contact_info.clone()),
            seo_defaults: Json(record.seo_defaults.clone()),
            updated_at: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FieldEditRequest {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct SocialLinkRequest {
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoSelectionRequest {
    pub media_id: uuid::Uuid,
}
