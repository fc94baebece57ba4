//! Authenticated-encryption envelope for periodic telemetry messages.
//!
//! A shared password is stretched once at startup into a 16-byte AES key
//! ([`kdf`]), which then seals every outgoing telemetry record into a
//! three-part base64 package and opens every incoming one ([`crypto`]).
//! Senders and viewers in any language interoperate as long as they use the
//! parameters in [`common::params`] bit-for-bit.
//!
//! Typical startup:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! let cfg = envelope::Config::from_env()?;
//! let key = cfg.derive_key()?; // slow by design; run once, hold forever
//! # Ok(())
//! # }
//! ```
//!
//! The key is immutable and `Send + Sync`; any number of concurrent senders
//! may share one [`DerivedKey`] as long as each `seal` call draws its own
//! nonce, which [`crypto::seal`] always does.

pub mod config;
pub mod crypto;
pub mod kdf;

pub use config::Config;
pub use crypto::{open, seal, OpenError, SealError};
pub use kdf::{derive_key, DerivedKey, KdfError};
