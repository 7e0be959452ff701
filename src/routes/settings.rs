use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use futures_util::TryStreamExt;
use tracing::instrument;

use crate::core::config::BrandingConfig;
use crate::core::{AppError, AppErrorType, AppSuccessResponse};
use crate::editor::{LogoSource, SaveOutcome, SettingsEditor, UploadedFile, SAVE_SUCCESS_MESSAGE};
use crate::models::settings::{
    FieldEditRequest, LogoSelectionRequest, SettingsEdit, SocialLinkRequest, SocialPlatform,
};

#[instrument(name = "Get Site Settings", skip(editor))]
#[get("")]
pub async fn get_site_settings(
    editor: web::Data<SettingsEditor>,
) -> Result<impl Responder, AppError> {
    let settings = editor.persisted().await.map_err(|e| {
        tracing::error!("Failed to fetch site settings: {:?}", e);
        AppError {
            message: Some("Failed to fetch site settings".to_string()),
            cause: Some(e.to_string()),
            error_type: AppErrorType::InternalServerError,
        }
    })?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(
        settings,
        "Site settings retrieved successfully",
    )))
}

#[instrument(name = "Get Site Logo", skip(editor, branding))]
#[get("/logo")]
pub async fn get_site_logo(
    editor: web::Data<SettingsEditor>,
    branding: web::Data<BrandingConfig>,
) -> Result<impl Responder, AppError> {
    let settings = editor.persisted().await?;
    let location = if settings.logo.is_empty() {
        branding.default_logo_url.clone()
    } else {
        settings.logo
    };

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish())
}

#[instrument(name = "Get Settings Draft", skip(editor))]
#[get("")]
pub async fn get_settings_draft(
    editor: web::Data<SettingsEditor>,
) -> Result<impl Responder, AppError> {
    let draft = editor.draft()?;
    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(draft, "Settings draft retrieved")))
}

#[instrument(name = "Get Editor Status", skip(editor))]
#[get("/status")]
pub async fn get_editor_status(
    editor: web::Data<SettingsEditor>,
) -> Result<impl Responder, AppError> {
    let status = editor.status()?;
    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(status, "Editor status retrieved")))
}

#[instrument(name = "Edit Settings Field", skip(editor, request))]
#[patch("/fields")]
pub async fn edit_settings_field(
    editor: web::Data<SettingsEditor>,
    request: web::Json<FieldEditRequest>,
) -> Result<impl Responder, AppError> {
    let FieldEditRequest { field, value } = request.into_inner();
    let draft = editor.apply_field_edit(&field, value)?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(draft, "Settings draft updated")))
}

#[instrument(name = "Apply Settings Edit", skip(editor, edit))]
#[patch("/edits")]
pub async fn apply_settings_edit(
    editor: web::Data<SettingsEditor>,
    edit: web::Json<SettingsEdit>,
) -> Result<impl Responder, AppError> {
    let draft = editor.apply_edit(edit.into_inner())?;
    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(draft, "Settings draft updated")))
}

#[instrument(name = "Edit Social Link", skip(editor, request))]
#[put("/social-links/{platform}")]
pub async fn edit_social_link(
    editor: web::Data<SettingsEditor>,
    platform: web::Path<String>,
    request: web::Json<SocialLinkRequest>,
) -> Result<impl Responder, AppError> {
    let platform = platform
        .into_inner()
        .parse::<SocialPlatform>()
        .map_err(AppError::validation_error)?;
    let draft = editor.apply_social_link_edit(platform, request.into_inner().value)?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(draft, "Social link updated")))
}

#[instrument(name = "Edit Contact Info JSON", skip(editor, body))]
#[put("/contact-info/json")]
pub async fn edit_contact_info_json(
    editor: web::Data<SettingsEditor>,
    body: String,
) -> Result<impl Responder, AppError> {
    let draft = editor.apply_contact_info_json(&body)?;
    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(draft, "Contact info updated")))
}

#[instrument(name = "Edit SEO Defaults JSON", skip(editor, body))]
#[put("/seo-defaults/json")]
pub async fn edit_seo_defaults_json(
    editor: web::Data<SettingsEditor>,
    body: String,
) -> Result<impl Responder, AppError> {
    let draft = editor.apply_seo_defaults_json(&body)?;
    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(draft, "SEO defaults updated")))
}

#[instrument(name = "Upload Logo", skip(editor, payload))]
#[post("/logo/upload")]
pub async fn upload_logo(
    editor: web::Data<SettingsEditor>,
    mut payload: Multipart,
) -> Result<impl Responder, AppError> {
    let max_size = editor.options().max_logo_size_bytes;
    let mut upload: Option<UploadedFile> = None;

    while let Some(mut field) = payload.try_next().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {:?}", e);
        AppError {
            message: Some("Invalid file upload format".to_string()),
            cause: Some(e.to_string()),
            error_type: AppErrorType::PayloadValidationError,
        }
    })? {
        let content_disposition = field.content_disposition();
        let field_name = content_disposition.get_name().unwrap_or("").to_string();

        if field_name != "file" {
            // Drain fields we don't use
            while field
                .try_next()
                .await
                .map_err(|e| AppError::validation_error(format!("Failed to skip field: {}", e)))?
                .is_some()
            {}
            continue;
        }

        let file_name = content_disposition
            .get_filename()
            .ok_or_else(|| AppError::validation_error("Filename is required"))?
            .to_string();

        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|e| AppError {
            message: Some("Failed to read file data".to_string()),
            cause: Some(e.to_string()),
            error_type: AppErrorType::PayloadValidationError,
        })? {
            bytes.extend_from_slice(&chunk);
            if bytes.len() > max_size {
                return Err(AppError::validation_error(format!(
                    "Logo exceeds the maximum size of {} bytes",
                    max_size
                )));
            }
        }

        upload = Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    let file = upload.ok_or_else(|| AppError::validation_error("File is required"))?;
    let draft = editor.set_logo(LogoSource::Upload(file)).await?;

    Ok(HttpResponse::Created().json(AppSuccessResponse::ok(draft, "Logo uploaded")))
}

#[instrument(name = "Select Logo From Library", skip(editor, request))]
#[put("/logo")]
pub async fn select_logo(
    editor: web::Data<SettingsEditor>,
    request: web::Json<LogoSelectionRequest>,
) -> Result<impl Responder, AppError> {
    let draft = editor
        .set_logo(LogoSource::Library(request.into_inner().media_id))
        .await?;
    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(draft, "Logo updated")))
}

#[instrument(name = "Clear Logo", skip(editor))]
#[delete("/logo")]
pub async fn clear_logo(editor: web::Data<SettingsEditor>) -> Result<impl Responder, AppError> {
    let draft = editor.set_logo(LogoSource::Clear).await?;
    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(draft, "Logo removed")))
}

#[instrument(name = "Get Media Picker Items", skip(editor))]
#[get("/media-picker")]
pub async fn get_media_picker_items(
    editor: web::Data<SettingsEditor>,
) -> Result<impl Responder, AppError> {
    let items = editor.media_picker_items().await?;
    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(items, "Media items retrieved")))
}

#[instrument(name = "Open Media Picker", skip(editor))]
#[post("/media-picker/open")]
pub async fn open_media_picker(
    editor: web::Data<SettingsEditor>,
) -> Result<impl Responder, AppError> {
    editor.open_media_picker();
    let status = editor.status()?;
    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(status, "Media picker opened")))
}

#[instrument(name = "Close Media Picker", skip(editor))]
#[post("/media-picker/close")]
pub async fn close_media_picker(
    editor: web::Data<SettingsEditor>,
) -> Result<impl Responder, AppError> {
    editor.close_media_picker();
    let status = editor.status()?;
    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(status, "Media picker closed")))
}

#[instrument(name = "Save Site Settings", skip(editor))]
#[post("/save")]
pub async fn save_site_settings(
    editor: web::Data<SettingsEditor>,
) -> Result<impl Responder, AppError> {
    match editor.save().await? {
        SaveOutcome::Saved(settings) => Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(
            settings,
            SAVE_SUCCESS_MESSAGE,
        ))),
        SaveOutcome::AlreadySaving => Err(AppError::conflict("A save is already in progress")),
    }
}
