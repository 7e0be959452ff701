use std::fmt::{Debug, Display};

use site_settings::core::{get_subscriber, init_subscriber, AppConfig};
use site_settings::site_settings_web_server::SiteSettingsWebServer;
use tokio::task::JoinError;

use colored::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let file_appender = tracing_appender::rolling::daily("/var/tmp/log/site_settings", "app");

    let subscriber = get_subscriber("site_settings".into(), "info".into(), file_appender);
    init_subscriber(subscriber);

    let config = AppConfig::new()?;
    let host = config.application.host.clone();

    let web_server = SiteSettingsWebServer::build(config).await?;
    let port = web_server.port();

    let server_task = tokio::spawn(web_server.run_until_stopped());

    println!("{}", "-----------------------------------------".green());
    println!("🚀 Server started on Addr: {}:{}", host, port);
    println!("{}", "-----------------------------------------".green());

    tokio::select! {
        o = server_task => {report_exit("Site settings API", o);}
    }
    Ok(())
}

fn report_exit(task_name: &str, outcome: Result<Result<(), impl Debug + Display>, JoinError>) {
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("{} has exited", task_name)
        }
        Ok(Err(e)) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} failed",
                task_name
            )
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{}' task failed to complete",
                task_name
            )
        }
    }
}
