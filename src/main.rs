use anyhow::Context;
use listmailer::{
    configuration::get_configuration,
    telemetry::{get_subscriber, init_subscriber},
    Application,
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("listmailer".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let settings = get_configuration().context("couldn't read settings")?;
    let application = Application::build(settings).await?;
    application.run_until_stopped().await?;
    Ok(())
}
