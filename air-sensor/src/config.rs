use clap::Parser;
use std::fmt;
use std::time::Duration;

/// Command-line and environment configuration for the simulated device.
#[derive(Clone, Parser)]
#[command(name = "air-sensor")]
#[command(about = "Simulated air-quality sensor reporting to the Aliyun IoT platform")]
#[command(version)]
pub struct Config {
    /// Product key of the device triple
    #[arg(long, env = "PRODUCT_KEY")]
    pub product_key: String,

    /// Device name of the device triple
    #[arg(long, env = "DEVICE_NAME")]
    pub device_name: String,

    /// Device secret of the device triple
    #[arg(long, env = "DEVICE_SECRET", hide_env_values = true)]
    pub device_secret: String,

    /// Platform region the product lives in
    #[arg(long, env = "REGION_ID", default_value = "cn-shanghai")]
    pub region_id: String,

    /// Broker host, derived from product key and region when unset
    #[arg(long, env = "MQTT_BROKER")]
    pub broker: Option<String>,

    #[arg(long, env = "MQTT_PORT", default_value_t = 1883)]
    pub port: u16,

    /// Seconds between two property reports
    #[arg(
        long,
        env = "INTERVAL_SECS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_secs: u64,

    #[arg(long, env = "KEEP_ALIVE_SECS", default_value_t = 300)]
    pub keep_alive_secs: u64,

    /// Also subscribe to the downlink control topic and log what arrives
    #[arg(
        long,
        env = "SUBSCRIBE_CONTROL",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub control: bool,
}

impl Config {
    pub fn identity(&self) -> DeviceIdentity {
        DeviceIdentity {
            product_key: self.product_key.clone(),
            device_name: self.device_name.clone(),
            device_secret: self.device_secret.clone(),
            region_id: self.region_id.clone(),
        }
    }

    pub fn broker_host(&self) -> String {
        self.broker
            .clone()
            .unwrap_or_else(|| self.identity().broker_host())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }
}

/// The device triple plus its region. Fixed for the life of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub product_key: String,
    pub device_name: String,
    pub device_secret: String,
    pub region_id: String,
}

impl DeviceIdentity {
    pub fn broker_host(&self) -> String {
        format!(
            "{}.iot-as-mqtt.{}.aliyuncs.com",
            self.product_key, self.region_id
        )
    }

    /// Topic the platform expects property reports on.
    pub fn property_post_topic(&self) -> String {
        format!(
            "/sys/{}/{}/thing/event/property/post",
            self.product_key, self.device_name
        )
    }

    /// Custom downlink topic carrying control commands for this device.
    pub fn control_topic(&self) -> String {
        format!("/{}/{}/user/control", self.product_key, self.device_name)
    }
}

impl fmt::Debug for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceIdentity")
            .field("product_key", &self.product_key)
            .field("device_name", &self.device_name)
            .field("device_secret", &"***")
            .field("region_id", &self.region_id)
            .finish()
    }
}
