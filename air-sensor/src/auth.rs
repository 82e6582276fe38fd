//! Aliyun IoT device credential (`securemode=3`, `signmethod=hmacsha1`).
//!
//! The broker rebuilds the signed content from the CONNECT fields and checks
//! the password against its own HMAC of it, so both the layout of the client
//! id and the order of the signed fields must stay exactly as they are here.

use crate::config::DeviceIdentity;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Transport tag carried in the client id and in the signed content.
pub const CLIENT_TAG: &str = "rumqttc";

/// MQTT CONNECT credentials for one connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub client_id: String,
    pub username: String,
    pub password: String,
}

impl Credential {
    /// Derives the credential for `identity` at `timestamp` (epoch seconds).
    pub fn derive(identity: &DeviceIdentity, timestamp: i64) -> Self {
        let client_id = format!(
            "{}|securemode=3,signmethod=hmacsha1,timestamp={}|",
            CLIENT_TAG, timestamp
        );
        let username = format!("{}&{}", identity.device_name, identity.product_key);
        let password = sign(
            &identity.device_secret,
            &content_to_sign(identity, timestamp),
        );

        Self {
            client_id,
            username,
            password,
        }
    }
}

/// Canonical string the password signs: `clientId`, `deviceName`,
/// `productKey`, `timestamp`, each name followed by its value, no separators.
pub fn content_to_sign(identity: &DeviceIdentity, timestamp: i64) -> String {
    format!(
        "clientId{}deviceName{}productKey{}timestamp{}",
        CLIENT_TAG, identity.device_name, identity.product_key, timestamp
    )
}

/// Lower-case hex HMAC-SHA1 of `content` keyed with `secret`.
pub fn sign(secret: &str, content: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(content.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> DeviceIdentity {
        DeviceIdentity {
            product_key: "pk1".to_string(),
            device_name: "dev1".to_string(),
            device_secret: "sekret".to_string(),
            region_id: "cn-shanghai".to_string(),
        }
    }

    #[test]
    fn test_content_field_order() {
        assert_eq!(
            content_to_sign(&identity(), 1_700_000_000),
            "clientIdrumqttcdeviceNamedev1productKeypk1timestamp1700000000"
        );
    }

    #[test]
    fn test_derive_is_deterministic() {
        let first = Credential::derive(&identity(), 1_700_000_000);
        let second = Credential::derive(&identity(), 1_700_000_000);
        assert_eq!(first, second);
    }

    #[test]
    fn test_timestamp_changes_credential() {
        let first = Credential::derive(&identity(), 1_700_000_000);
        let later = Credential::derive(&identity(), 1_700_000_005);

        assert_eq!(first.username, later.username);
        assert_ne!(first.client_id, later.client_id);
        assert_ne!(first.password, later.password);
    }

    #[test]
    fn test_secret_changes_password() {
        let mut other = identity();
        other.device_secret = "another".to_string();

        let a = Credential::derive(&identity(), 1_700_000_000);
        let b = Credential::derive(&other, 1_700_000_000);
        assert_ne!(a.password, b.password);
    }

    #[test]
    fn test_password_is_lowercase_hex() {
        let credential = Credential::derive(&identity(), 1_700_000_000);

        assert_eq!(credential.password.len(), 40);
        assert!(credential
            .password
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
