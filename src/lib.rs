pub mod core;
pub mod db;
pub mod editor;
pub mod models;
pub mod routes;
pub mod site_settings_web_server;
pub mod store;
