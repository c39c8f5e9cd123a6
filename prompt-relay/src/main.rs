use dotenvy::dotenv;
use prompt_relay::config::get_configuration;
use prompt_relay::startup::Application;
use service_core::observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "prompt-relay",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    );
    init_metrics();

    let application = Application::build(configuration).await.map_err(|e| {
        tracing::error!("Startup error: {:#}", e);
        e
    })?;

    application.run_until_stopped().await?;

    Ok(())
}
