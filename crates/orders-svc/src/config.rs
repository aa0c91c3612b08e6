//! Configuration loading and validation for the order service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid,
//! including keys whose length does not fit the selected algorithms.

use anyhow::{Context, Result};
use fieldsec::crypto::{CipherAlgorithm, MacAlgorithm};
use fieldsec::{FieldCipher, KeyMaterial};
use serde::Deserialize;
use zeroize::Zeroizing;

/// Validated order service configuration.
///
/// Key strings are wiped from memory when the config is dropped.
#[derive(Deserialize)]
pub struct Config {
    /// Base64 block-cipher key. Length must match `cipher_algorithm`. **Required.**
    pub field_cipher_key: Zeroizing<String>,

    /// Base64 MAC key. Length must match `mac_algorithm`. **Required.**
    pub field_mac_key: Zeroizing<String>,

    /// Block cipher for encrypted columns.
    #[serde(default)]
    pub cipher_algorithm: CipherAlgorithm,

    /// Keyed hash authenticating encrypted columns.
    #[serde(default)]
    pub mac_algorithm: MacAlgorithm,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// HTTP header carrying the caller's principal id.
    #[serde(default = "default_principal_header")]
    pub principal_header_name: String,

    /// Register demo principals and orders at startup.
    #[serde(default)]
    pub seed_demo_data: bool,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_principal_header() -> String {
    "X-Principal-Id".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::default())
    }

    fn load(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Build the field cipher from the configured keys and algorithms.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is not valid base64, is all zeroes, or has the
    /// wrong length for its algorithm.
    pub fn field_cipher(&self) -> Result<FieldCipher> {
        let keys = KeyMaterial::from_base64(&self.field_cipher_key, &self.field_mac_key)
            .context("invalid FIELD_CIPHER_KEY / FIELD_MAC_KEY")?;
        FieldCipher::from_config(self.cipher_algorithm, self.mac_algorithm, keys)
            .context("field keys do not match the configured algorithms")
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.field_cipher_key, "FIELD_CIPHER_KEY")?;
        ensure_non_empty(&self.field_mac_key, "FIELD_MAC_KEY")?;
        ensure_non_empty(&self.principal_header_name, "PRINCIPAL_HEADER_NAME")?;

        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        self.field_cipher()?;
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("field_cipher_key", &"[REDACTED]")
            .field("field_mac_key", &"[REDACTED]")
            .field("cipher_algorithm", &self.cipher_algorithm)
            .field("mac_algorithm", &self.mac_algorithm)
            .field("listen_port", &self.listen_port)
            .field("principal_header_name", &self.principal_header_name)
            .field("seed_demo_data", &self.seed_demo_data)
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        config::Environment::default().source(Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    fn valid() -> Config {
        Config {
            field_cipher_key: STANDARD.encode([0x11u8; 16]).into(),
            field_mac_key: STANDARD.encode([0x22u8; 32]).into(),
            cipher_algorithm: CipherAlgorithm::default(),
            mac_algorithm: MacAlgorithm::default(),
            listen_port: default_listen_port(),
            principal_header_name: default_principal_header(),
            seed_demo_data: false,
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_listen_port(), 8080);
        assert_eq!(default_principal_header(), "X-Principal-Id");
        assert_eq!(default_log_level(), "info");
        assert_eq!(CipherAlgorithm::default(), CipherAlgorithm::Aes128Cbc);
        assert_eq!(MacAlgorithm::default(), MacAlgorithm::HmacSha256);
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_cipher_key() {
        let cfg = Config {
            field_cipher_key: Zeroizing::new(String::new()),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_key_length_mismatch() {
        let cfg = Config {
            cipher_algorithm: CipherAlgorithm::Aes256Cbc,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_key() {
        let cfg = Config {
            field_cipher_key: STANDARD.encode([0u8; 16]).into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn debug_redacts_keys() {
        let cfg = valid();
        let printed = format!("{cfg:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains(cfg.field_cipher_key.as_str()));
    }

    #[test]
    fn loads_algorithm_names_from_environment() {
        let cipher_key = STANDARD.encode([0x11u8; 32]);
        let mac_key = STANDARD.encode([0x22u8; 64]);
        let cfg = Config::load(env(&[
            ("FIELD_CIPHER_KEY", &cipher_key),
            ("FIELD_MAC_KEY", &mac_key),
            ("CIPHER_ALGORITHM", "aes-256-cbc"),
            ("MAC_ALGORITHM", "hmac-sha512"),
        ]))
        .unwrap();
        assert_eq!(cfg.cipher_algorithm, CipherAlgorithm::Aes256Cbc);
        assert_eq!(cfg.mac_algorithm, MacAlgorithm::HmacSha512);
        assert_eq!(cfg.listen_port, 8080);
        assert_eq!(cfg.field_cipher().unwrap().algorithms(), ("aes-256-cbc", "hmac-sha512"));
    }

    #[test]
    fn default_algorithm_spelled_out_loads() {
        let cipher_key = STANDARD.encode([0x11u8; 16]);
        let mac_key = STANDARD.encode([0x22u8; 32]);
        let cfg = Config::load(env(&[
            ("FIELD_CIPHER_KEY", &cipher_key),
            ("FIELD_MAC_KEY", &mac_key),
            ("CIPHER_ALGORITHM", "aes-128-cbc"),
        ]))
        .unwrap();
        assert_eq!(cfg.cipher_algorithm, CipherAlgorithm::Aes128Cbc);
    }

    #[test]
    fn unknown_algorithm_fails_to_load() {
        let cipher_key = STANDARD.encode([0x11u8; 16]);
        let mac_key = STANDARD.encode([0x22u8; 32]);
        let res = Config::load(env(&[
            ("FIELD_CIPHER_KEY", &cipher_key),
            ("FIELD_MAC_KEY", &mac_key),
            ("CIPHER_ALGORITHM", "aes128-cbc"),
        ]));
        assert!(res.is_err());
    }
}
