//! MQTT session with the platform broker.
//!
//! `connect` only prepares the client; nothing touches the network until the
//! event loop returned with it is driven by `drive`.

use crate::auth::Credential;
use crate::config::Config;
use crate::errors::Result;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tracing::{debug, error, info};

const REQUEST_CHANNEL_CAPACITY: usize = 10;

/// Builds the CONNECT options for `credential` against the configured broker.
pub fn mqtt_options(config: &Config, credential: &Credential) -> MqttOptions {
    let mut mqtt_options =
        MqttOptions::new(credential.client_id.clone(), config.broker_host(), config.port);
    mqtt_options.set_credentials(credential.username.clone(), credential.password.clone());
    mqtt_options.set_keep_alive(config.keep_alive());
    mqtt_options.set_clean_session(false);
    mqtt_options
}

pub fn connect(config: &Config, credential: &Credential) -> (AsyncClient, EventLoop) {
    info!(
        "Connecting to {}:{} as {}",
        config.broker_host(),
        config.port,
        credential.username
    );
    AsyncClient::new(mqtt_options(config, credential), REQUEST_CHANNEL_CAPACITY)
}

/// Drives the event loop until the first connection error, which is logged
/// and returned. There is no reconnect.
///
/// When `control_topic` is set it is subscribed after each CONNACK; inbound
/// messages are only logged.
pub async fn drive(
    mut eventloop: EventLoop,
    client: AsyncClient,
    control_topic: Option<String>,
) -> Result<()> {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                info!(
                    "Connected with result code {:?} (session present: {})",
                    ack.code, ack.session_present
                );
                if let Some(topic) = control_topic.clone() {
                    let client = client.clone();
                    // The request queue is drained by this loop, so never wait on it here.
                    tokio::spawn(async move {
                        match client.subscribe(topic.as_str(), QoS::AtLeastOnce).await {
                            Ok(()) => info!("Subscribed to {} with QoS 1", topic),
                            Err(e) => error!("Failed to subscribe to {}: {}", topic, e),
                        }
                    });
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                info!(
                    "{} {}",
                    publish.topic,
                    String::from_utf8_lossy(&publish.payload)
                );
            }
            Ok(Event::Incoming(Packet::PubAck(ack))) => {
                debug!("Broker acknowledged packet {}", ack.pkid);
            }
            Ok(_) => {}
            Err(e) => {
                error!("MQTT connection error: {}", e);
                return Err(e.into());
            }
        }
    }
}
