use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Alink method name for a device property report.
pub const PROPERTY_POST_METHOD: &str = "thing.event.property.post";

pub const TEMP_RANGE: RangeInclusive<u32> = 20..=30;
pub const HUMI_RANGE: RangeInclusive<u32> = 50..=70;
pub const DUST_RANGE: RangeInclusive<u32> = 10..=60;
pub const ECO2_RANGE: RangeInclusive<u32> = 400..=600;
pub const TVOC_RANGE: RangeInclusive<u32> = 0..=200;
pub const HCHO_RANGE: RangeInclusive<u32> = 0..=100;

/// One reading per sensor, keyed by the property identifiers of the product model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReadings {
    #[serde(rename = "Temp")]
    pub temp: u32,
    #[serde(rename = "Humi")]
    pub humi: u32,
    #[serde(rename = "Dust")]
    pub dust: u32,
    #[serde(rename = "eCO2")]
    pub eco2: u32,
    #[serde(rename = "TVOC")]
    pub tvoc: u32,
    #[serde(rename = "HCHO")]
    pub hcho: u32,
}

impl SensorReadings {
    pub fn sample(rng: &mut impl Rng) -> Self {
        Self {
            temp: rng.gen_range(TEMP_RANGE),
            humi: rng.gen_range(HUMI_RANGE),
            dust: rng.gen_range(DUST_RANGE),
            eco2: rng.gen_range(ECO2_RANGE),
            tvoc: rng.gen_range(TVOC_RANGE),
            hcho: rng.gen_range(HCHO_RANGE),
        }
    }
}

/// Property report sent on every publish tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Epoch seconds at capture.
    pub id: i64,
    pub params: SensorReadings,
    pub method: String,
}

impl TelemetrySample {
    pub fn new(id: i64, params: SensorReadings) -> Self {
        Self {
            id,
            params,
            method: PROPERTY_POST_METHOD.to_string(),
        }
    }

    /// Samples every sensor and stamps the report with the current time.
    pub fn capture(rng: &mut impl Rng) -> Self {
        Self::new(Utc::now().timestamp(), SensorReadings::sample(rng))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_json_shape() {
        let sample = TelemetrySample::new(
            1_700_000_000,
            SensorReadings {
                temp: 25,
                humi: 60,
                dust: 30,
                eco2: 450,
                tvoc: 12,
                hcho: 7,
            },
        );

        let value: serde_json::Value = serde_json::from_str(&sample.to_json().unwrap()).unwrap();
        assert_eq!(value["id"], 1_700_000_000i64);
        assert_eq!(value["method"], "thing.event.property.post");
        assert_eq!(value["params"]["Temp"], 25);
        assert_eq!(value["params"]["Humi"], 60);
        assert_eq!(value["params"]["Dust"], 30);
        assert_eq!(value["params"]["eCO2"], 450);
        assert_eq!(value["params"]["TVOC"], 12);
        assert_eq!(value["params"]["HCHO"], 7);
        assert_eq!(value["params"].as_object().unwrap().len(), 6);
    }

    #[test]
    fn test_capture_uses_current_time() {
        let mut rng = StdRng::seed_from_u64(7);
        let before = Utc::now().timestamp();
        let sample = TelemetrySample::capture(&mut rng);
        let after = Utc::now().timestamp();

        assert!(sample.id >= before && sample.id <= after);
        assert_eq!(sample.method, PROPERTY_POST_METHOD);
    }

    #[test]
    fn test_seeded_sampling_repeats() {
        let a = SensorReadings::sample(&mut StdRng::seed_from_u64(42));
        let b = SensorReadings::sample(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
