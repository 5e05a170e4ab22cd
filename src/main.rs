use statusac::configuration::get_configuration;
use statusac::startup::Application;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    info!("Starting statusac service...");

    let configuration = get_configuration()?;
    let application = Application::build(configuration).await?;
    application.run_until_stopped().await?;

    info!("Statusac service stopped");
    Ok(())
}
