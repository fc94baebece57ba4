//! Configuration loading and validation for envelope participants.
//!
//! All values are read from environment variables at startup. Defaults come
//! from [`common::params`], the single definition shared by every sender and
//! viewer build — overriding one of them here means re-deriving keys
//! everywhere. Validation (and key derivation via [`Config::derive_key`])
//! happens eagerly so that bad parameters stop the process before any
//! message is sealed.

use anyhow::{Context, Result};
use serde::Deserialize;

use common::params::{self, SALT_LEN};

use crate::kdf::{derive_key, DerivedKey};

/// Validated envelope configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// The shared password all participants derive the key from. **Required.**
    /// Never transmitted and never logged.
    pub shared_secret: String,

    /// Hex encoding of the 16-byte public PBKDF2 salt.
    #[serde(default = "default_salt_hex")]
    pub salt_hex: String,

    /// PBKDF2-HMAC-SHA256 iteration count.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_salt_hex() -> String {
    params::KEY_SALT_HEX.into()
}
fn default_kdf_iterations() -> u32 {
    params::KDF_ITERATIONS
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be
    /// parsed, or if validation fails.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.shared_secret.trim().is_empty() {
            anyhow::bail!("SHARED_SECRET is required and must not be empty");
        }
        if self.kdf_iterations == 0 {
            anyhow::bail!("KDF_ITERATIONS must be at least 1");
        }
        self.salt()?;
        Ok(())
    }

    /// Decode the configured salt to its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `salt_hex` is not valid hex or does not decode to
    /// exactly [`SALT_LEN`] bytes.
    pub fn salt(&self) -> Result<[u8; SALT_LEN]> {
        let bytes = hex::decode(&self.salt_hex).context("SALT_HEX is not valid hex")?;
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| anyhow::anyhow!("SALT_HEX must decode to exactly {SALT_LEN} bytes"))
    }

    /// Derive the shared symmetric key from this configuration.
    ///
    /// Deliberately slow (see [`common::params::KDF_ITERATIONS`]); call once
    /// at startup and hold the key for the process lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error if the salt is malformed or the KDF rejects the
    /// parameters.
    pub fn derive_key(&self) -> Result<DerivedKey> {
        let salt = self.salt()?;
        derive_key(&self.shared_secret, &salt, self.kdf_iterations)
            .context("failed to derive telemetry key")
    }
}
