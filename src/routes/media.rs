use actix_web::{delete, get, post, web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::core::{AppError, AppSuccessResponse};
use crate::models::media::{MediaQuery, NewMediaItemRequest};
use crate::store::{MediaCatalog, ObjectUrlRegistry};

#[instrument(name = "List Media", skip(catalog))]
#[get("")]
pub async fn list_media(
    catalog: web::Data<dyn MediaCatalog>,
    query: web::Query<MediaQuery>,
) -> Result<impl Responder, AppError> {
    let items = catalog.list(query.into_inner().media_type).await?;
    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(items, "Media items retrieved")))
}

#[instrument(name = "Add Media Item", skip(catalog, request))]
#[post("")]
pub async fn add_media_item(
    catalog: web::Data<dyn MediaCatalog>,
    request: web::Json<NewMediaItemRequest>,
) -> Result<impl Responder, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let item = request.into_item();
    catalog.append(item.clone()).await?;

    Ok(HttpResponse::Created().json(AppSuccessResponse::ok(item, "Media item added")))
}

#[instrument(name = "View Object URL", skip(object_urls))]
#[get("/blob/{object_id}")]
pub async fn view_object_url(
    object_urls: web::Data<ObjectUrlRegistry>,
    object_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let object = object_urls.get(object_id.into_inner())?;
    Ok(HttpResponse::Ok()
        .content_type(object.content_type)
        .body(object.bytes))
}

#[instrument(name = "Revoke Object URL", skip(object_urls))]
#[delete("/blob/{object_id}")]
pub async fn revoke_object_url(
    object_urls: web::Data<ObjectUrlRegistry>,
    object_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let object_id = object_id.into_inner();
    object_urls.revoke(object_id)?;
    tracing::info!("Revoked object URL {}", object_id);

    Ok(HttpResponse::Ok().json(AppSuccessResponse::ok(
        ObjectUrlRegistry::url_for(object_id),
        "Object URL revoked",
    )))
}
