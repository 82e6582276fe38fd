use crate::errors::Result;
use crate::telemetry::TelemetrySample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rumqttc::{AsyncClient, QoS};
use std::time::Duration;
use tracing::{error, info};

/// Destination of serialized property reports.
#[allow(async_fn_in_trait)]
pub trait TelemetrySink {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<()>;
}

impl TelemetrySink for AsyncClient {
    /// Queues the report at QoS 1 (not retained). Delivery is acknowledged
    /// through the event loop, not awaited here.
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.publish(topic, QoS::AtLeastOnce, false, payload).await?;
        Ok(())
    }
}

/// Posts a fresh random property report every `interval`.
pub struct Publisher<S> {
    sink: S,
    topic: String,
    interval: Duration,
}

impl<S: TelemetrySink> Publisher<S> {
    pub fn new(sink: S, topic: impl Into<String>, interval: Duration) -> Self {
        Self {
            sink,
            topic: topic.into(),
            interval,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Samples, serializes and sends one report; returns what was sent.
    pub async fn publish_once(&self, rng: &mut impl Rng) -> Result<TelemetrySample> {
        let sample = TelemetrySample::capture(rng);
        let payload = sample.to_json()?;

        info!("send data to iot server: {}", payload);
        self.sink.send(&self.topic, payload.into_bytes()).await?;

        Ok(sample)
    }

    /// Publishes forever. Returns only when a send fails.
    pub async fn run(self) -> Result<()> {
        info!(
            "Publishing property reports to {} every {:?}",
            self.topic, self.interval
        );

        let mut rng = StdRng::from_entropy();
        let mut counter = 0u64;

        loop {
            if let Err(e) = self.publish_once(&mut rng).await {
                error!("Failed to publish after {} reports: {}", counter, e);
                return Err(e);
            }
            counter += 1;

            tokio::time::sleep(self.interval).await;
        }
    }
}
