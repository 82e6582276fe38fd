use air_sensor::{connection, Config, Credential, Publisher};
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let identity = config.identity();
    info!("Starting air sensor device {:?}", identity);

    let credential = Credential::derive(&identity, Utc::now().timestamp());
    let (client, eventloop) = connection::connect(&config, &credential);

    let control_topic = config.control.then(|| identity.control_topic());
    let mut driver = tokio::spawn(connection::drive(eventloop, client.clone(), control_topic));

    let publisher = Publisher::new(client, identity.property_post_topic(), config.interval());

    let failed = tokio::select! {
        result = &mut driver => {
            match result {
                Ok(Ok(())) => false,
                Ok(Err(e)) => {
                    error!("MQTT event loop stopped: {}", e);
                    true
                }
                Err(e) => {
                    error!("MQTT event loop task failed: {}", e);
                    true
                }
            }
        }
        result = publisher.run() => {
            if let Err(e) = result {
                error!("Publisher stopped: {}", e);
            }
            true
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            false
        }
    };

    info!("Shutting down");
    if failed {
        std::process::exit(1);
    }
}
