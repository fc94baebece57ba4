//! Password-based key derivation: shared secret → 16-byte AES key.
//!
//! PBKDF2-HMAC-SHA256 stretches the low-entropy shared password into the
//! symmetric key. Derivation is deterministic — same secret, salt, and
//! iteration count always produce the same key — so independently built
//! senders and viewers converge on identical keys without ever exchanging
//! key material.
//!
//! # Security invariants
//!
//! - The derived key is **never** written to disk, logged, or included in
//!   error messages.
//! - Parameter problems surface here, at startup, not at the first seal.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use common::params::{KEY_LEN, SALT_LEN};

/// Errors produced during key derivation.
#[derive(Debug, Error)]
pub enum KdfError {
    /// The salt is not exactly [`SALT_LEN`] bytes.
    #[error("salt has invalid length: expected {SALT_LEN} bytes, got {0}")]
    InvalidSaltLength(usize),

    /// The iteration count is zero.
    #[error("iteration count must be at least 1")]
    InvalidIterationCount,

    /// The PBKDF2 primitive could not produce the requested output.
    #[error("key derivation primitive failed")]
    DerivationFailure,
}

/// The 16-byte symmetric key shared by all seal/open calls.
///
/// Immutable after derivation and safe to share across threads. The buffer is
/// overwritten with zeroes on drop to shorten the window during which key
/// material lives in RAM.
#[derive(Clone)]
pub struct DerivedKey(Box<[u8; KEY_LEN]>);

impl DerivedKey {
    /// Wrap existing key bytes, e.g. from a test vector.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Box::new(bytes))
    }

    /// Borrow the raw key bytes for the cipher.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive the shared symmetric key from the password and public salt.
///
/// Pure function of its inputs: no randomness, no side effects beyond CPU
/// time. At the reference iteration count (one million) this takes on the
/// order of a second — run it once at startup and hold the key for the
/// process lifetime.
///
/// # Errors
///
/// Returns [`KdfError::InvalidSaltLength`] or
/// [`KdfError::InvalidIterationCount`] on bad parameters, and
/// [`KdfError::DerivationFailure`] if the underlying primitive rejects the
/// request. All are startup-fatal: a malformed key would waste every
/// subsequent message.
pub fn derive_key(secret: &str, salt: &[u8], iterations: u32) -> Result<DerivedKey, KdfError> {
    if salt.len() != SALT_LEN {
        return Err(KdfError::InvalidSaltLength(salt.len()));
    }
    if iterations == 0 {
        return Err(KdfError::InvalidIterationCount);
    }

    debug!(iterations, "deriving telemetry key");
    let mut key = Box::new([0u8; KEY_LEN]);
    pbkdf2::<Hmac<Sha256>>(secret.as_bytes(), salt, iterations, key.as_mut_slice())
        .map_err(|_| KdfError::DerivationFailure)?;
    debug!("telemetry key derived");

    Ok(DerivedKey(key))
}
