use once_cell::sync::Lazy;
use secrecy::Secret;
use serde_json::Value;
use site_settings::core::config::{
    ApplicationConfig, BrandingConfig, EditorConfig, PostgresConfig, StorageBackend, StorageConfig,
};
use site_settings::core::{get_subscriber, init_subscriber, AppConfig};
use site_settings::site_settings_web_server::{Backends, SiteSettingsWebServer};

pub const DEFAULT_LOGO_URL: &str = "https://cdn.example.test/default-logo.png";

// Set TEST_LOG to see the logs of the app under test
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_json(&self, path: &str) -> Value {
        self.get(path)
            .await
            .json()
            .await
            .expect("Response was not JSON.")
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_text(&self, path: &str, body: &str) -> reqwest::Response {
        self.api_client
            .put(self.url(path))
            .header("Content-Type", "text/plain")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post(&self, path: &str) -> reqwest::Response {
        self.api_client
            .post(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.api_client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn upload_logo(&self, file_name: &str, mime: &str, bytes: Vec<u8>) -> reqwest::Response {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("Invalid mime type.");
        let form = reqwest::multipart::Form::new().part("file", part);

        self.api_client
            .post(self.url("/admin/settings/logo/upload"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn save(&self) -> reqwest::Response {
        self.post("/admin/settings/save").await
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        application: ApplicationConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        postgres: PostgresConfig {
            username: "postgres".to_string(),
            password: Secret::new("password".to_string()),
            host: "127.0.0.1".to_string(),
            port: 5432,
            database_name: "site_settings".to_string(),
            require_ssl: false,
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            run_migrations: false,
        },
        editor: EditorConfig::default(),
        branding: BrandingConfig {
            default_logo_url: DEFAULT_LOGO_URL.to_string(),
        },
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(Backends::in_memory()).await
}

pub async fn spawn_app_with(backends: Backends) -> TestApp {
    Lazy::force(&TRACING);

    let application = SiteSettingsWebServer::build_with(test_config(), backends)
        .await
        .expect("Failed to build application.");
    serve(application)
}

/// Build the backends from `configuration` the way `main` does.
pub async fn spawn_app_from_config(configuration: AppConfig) -> TestApp {
    Lazy::force(&TRACING);

    let application = SiteSettingsWebServer::build(configuration)
        .await
        .expect("Failed to build application.");
    serve(application)
}

fn serve(application: SiteSettingsWebServer) -> TestApp {
    let address = format!("http://127.0.0.1:{}", application.port());
    let _ = tokio::spawn(application.run_until_stopped());

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address,
        api_client,
    }
}
