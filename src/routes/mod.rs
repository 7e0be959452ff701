use actix_web::web::{scope, ServiceConfig};
use actix_web::Scope;
use media::{add_media_item, list_media, revoke_object_url, view_object_url};
use settings::{
    apply_settings_edit, clear_logo, close_media_picker, edit_contact_info_json,
    edit_seo_defaults_json, edit_settings_field, edit_social_link, get_editor_status,
    get_media_picker_items, get_settings_draft, get_site_logo, get_site_settings,
    open_media_picker, save_site_settings, select_logo, upload_logo,
};
mod health_check;
mod media;
mod settings;

use crate::routes::health_check::*;

fn util_routes() -> Scope {
    scope("").service(health_check)
}

fn public_settings_routes() -> Scope {
    scope("settings")
        .service(get_site_settings)
        .service(get_site_logo)
}

fn admin_settings_routes() -> Scope {
    scope("admin/settings")
        .service(get_settings_draft)
        .service(get_editor_status)
        .service(edit_settings_field)
        .service(apply_settings_edit)
        .service(edit_social_link)
        .service(edit_contact_info_json)
        .service(edit_seo_defaults_json)
        // logo
        .service(upload_logo)
        .service(select_logo)
        .service(clear_logo)
        // media picker
        .service(get_media_picker_items)
        .service(open_media_picker)
        .service(close_media_picker)
        .service(save_site_settings)
}

fn media_routes() -> Scope {
    scope("media")
        .service(list_media)
        .service(add_media_item)
        .service(view_object_url)
        .service(revoke_object_url)
}

pub fn site_settings_routes(conf: &mut ServiceConfig) {
    conf.service(
        scope("api/v1")
            .service(public_settings_routes())
            .service(admin_settings_routes())
            .service(media_routes())
            .service(util_routes()),
    );
}
