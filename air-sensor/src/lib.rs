//! Simulated air-quality sensor for the Aliyun IoT platform.
//!
//! The device signs in with the platform's HMAC-SHA1 device credential,
//! keeps one MQTT session open and posts a random property report on a
//! fixed interval.

pub mod auth;
pub mod config;
pub mod connection;
pub mod errors;
pub mod publisher;
pub mod telemetry;

pub use auth::Credential;
pub use config::{Config, DeviceIdentity};
pub use errors::{Error, Result};
pub use publisher::{Publisher, TelemetrySink};
pub use telemetry::{SensorReadings, TelemetrySample};
