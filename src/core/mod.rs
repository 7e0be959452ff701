pub mod config;
mod responses;
mod telemetry;

pub use self::config::AppConfig;
pub use responses::*;
pub use telemetry::*;
