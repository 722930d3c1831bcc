use revline::configuration::get_config;
use revline::startup::Application;
use revline::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("revline".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = get_config().expect("Failed to read configuration.");

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
