//! Sealing and opening of individual telemetry records.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes128Gcm, Nonce,
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::warn;

use common::params::{NONCE_LEN, TAG_LEN};
use common::{PackageError, SealedPackage};

use crate::kdf::DerivedKey;

/// Errors produced while sealing an outgoing record.
///
/// A failed seal drops that message; the caller retries later with a fresh
/// nonce (every call draws one) — never by replaying cipher state.
#[derive(Debug, Error)]
pub enum SealError {
    /// The record contained a value JSON cannot represent.
    #[error("failed to serialise record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The AEAD primitive reported a fault.
    #[error("aead encryption failed")]
    AeadFailure,
}

/// Errors produced while opening a received package.
///
/// All variants mean the same thing operationally: drop the package and log
/// it. None are retryable — the same bytes will fail the same way.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The package could not be decoded into its three raw parts.
    #[error(transparent)]
    Malformed(#[from] PackageError),

    /// Tag verification failed: tampered data, wrong key, or a nonce paired
    /// with the wrong ciphertext. No plaintext is ever returned.
    #[error("package failed authentication")]
    Authentication,

    /// The tag verified but the plaintext is not a valid record — a sender
    /// bug, not an attack.
    #[error("authenticated plaintext is not a valid record: {0}")]
    Deserialization(#[source] serde_json::Error),
}

/// Serialize and encrypt one telemetry record.
///
/// A random 96-bit nonce is generated per call via the OS CSPRNG; it is never
/// derived from a counter or timestamp, so nonces stay independent across
/// concurrent senders and process restarts. The result carries all three
/// parts or the call fails — a partial package is never produced.
///
/// # Errors
///
/// Returns [`SealError::Serialization`] if the record cannot be encoded as
/// JSON, or [`SealError::AeadFailure`] on an internal AEAD error (unreachable
/// with a valid key and nonce).
pub fn seal<T: Serialize>(key: &DerivedKey, record: &T) -> Result<SealedPackage, SealError> {
    let plaintext = serde_json::to_vec(record)?;

    // Use OsRng for a cryptographically secure random nonce.
    use aes_gcm::aead::rand_core::RngCore;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let cipher = Aes128Gcm::new(key.as_bytes().into());
    let mut sealed = cipher
        .encrypt(nonce, plaintext.as_ref())
        .map_err(|_| SealError::AeadFailure)?;

    // The aead crate appends the 16-byte tag to the ciphertext; the wire
    // format carries it detached.
    let tag_bytes = sealed.split_off(sealed.len() - TAG_LEN);
    let auth_tag: [u8; TAG_LEN] = tag_bytes
        .as_slice()
        .try_into()
        .map_err(|_| SealError::AeadFailure)?;

    Ok(SealedPackage::from_parts(&sealed, &nonce_bytes, &auth_tag))
}

/// Decrypt, authenticate, and deserialize one received package.
///
/// Tag verification runs over the whole ciphertext before a single plaintext
/// byte is released; on any failure the partial buffer is discarded.
///
/// # Errors
///
/// Returns [`OpenError::Malformed`] if base64 decoding or the part length
/// checks fail, [`OpenError::Authentication`] if the tag does not verify,
/// and [`OpenError::Deserialization`] if the authenticated plaintext is not
/// a valid record.
pub fn open<T: DeserializeOwned>(key: &DerivedKey, package: &SealedPackage) -> Result<T, OpenError> {
    let parts = package.decode()?;
    let nonce = Nonce::from_slice(&parts.nonce);

    // Reattach the tag in the postfix position the aead crate expects.
    let mut sealed = parts.ciphertext;
    sealed.extend_from_slice(&parts.auth_tag);

    let cipher = Aes128Gcm::new(key.as_bytes().into());
    let plaintext = cipher.decrypt(nonce, sealed.as_ref()).map_err(|_| {
        warn!("received package failed authentication; dropping");
        OpenError::Authentication
    })?;

    serde_json::from_slice(&plaintext).map_err(OpenError::Deserialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use common::params::KEY_LEN;
    use common::protocol::{TelemetryRecord, TriageMode, Vitals};
    use serde_json::{json, Value};
    use std::collections::HashSet;

    fn test_key() -> DerivedKey {
        DerivedKey::from_bytes([0x42u8; KEY_LEN])
    }

    fn sample_record() -> TelemetryRecord {
        TelemetryRecord {
            ambulance_id: "AMB-3".into(),
            patient_name: "Riley Okafor".into(),
            vitals: Vitals {
                heart_rate: 84,
                sp_o2: 98,
                temperature: 36.6,
            },
            mode: TriageMode::Stable,
            timestamp: 1_724_500_123.5,
        }
    }

    // Flip one bit in the decoded bytes of a part, then re-encode it.
    fn flip_bit(encoded: &str) -> String {
        let mut bytes = STANDARD.decode(encoded).unwrap();
        bytes[0] ^= 0x01;
        STANDARD.encode(bytes)
    }

    #[test]
    fn round_trip_typed_record() {
        let key = test_key();
        let record = sample_record();
        let package = seal(&key, &record).unwrap();
        let opened: TelemetryRecord = open(&key, &package).unwrap();
        assert_eq!(opened, record);
    }

    #[test]
    fn round_trip_arbitrary_json() {
        let key = test_key();
        let record = json!({
            "nested": {"a": [1, 2, 3], "b": "text"},
            "empty": {},
            "unicode": "überwachung 🚑",
        });
        let package = seal(&key, &record).unwrap();
        let opened: Value = open(&key, &package).unwrap();
        assert_eq!(opened, record);
    }

    #[test]
    fn round_trip_with_derived_key() {
        let key = crate::kdf::derive_key("password", &common::params::KEY_SALT, 1_000).unwrap();
        let package = seal(&key, &sample_record()).unwrap();
        let opened: TelemetryRecord = open(&key, &package).unwrap();
        assert_eq!(opened, sample_record());
    }

    #[test]
    fn nonces_never_repeat() {
        let key = test_key();
        let record = json!({"n": 1});
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let package = seal(&key, &record).unwrap();
            assert!(seen.insert(package.nonce), "nonce collision");
        }
    }

    #[test]
    fn produced_parts_have_contract_lengths() {
        let key = test_key();
        let package = seal(&key, &sample_record()).unwrap();
        let parts = package.decode().unwrap();
        assert_eq!(parts.nonce.len(), NONCE_LEN);
        assert_eq!(parts.auth_tag.len(), TAG_LEN);
        // GCM ciphertext has the same length as the plaintext.
        let plaintext_len = serde_json::to_vec(&sample_record()).unwrap().len();
        assert_eq!(parts.ciphertext.len(), plaintext_len);
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let key = test_key();
        let mut package = seal(&key, &sample_record()).unwrap();
        package.ciphertext = flip_bit(&package.ciphertext);
        let result: Result<TelemetryRecord, _> = open(&key, &package);
        assert!(matches!(result, Err(OpenError::Authentication)));
    }

    #[test]
    fn tampered_nonce_fails_authentication() {
        let key = test_key();
        let mut package = seal(&key, &sample_record()).unwrap();
        package.nonce = flip_bit(&package.nonce);
        let result: Result<TelemetryRecord, _> = open(&key, &package);
        assert!(matches!(result, Err(OpenError::Authentication)));
    }

    #[test]
    fn tampered_tag_fails_authentication() {
        let key = test_key();
        let mut package = seal(&key, &sample_record()).unwrap();
        package.auth_tag = flip_bit(&package.auth_tag);
        let result: Result<TelemetryRecord, _> = open(&key, &package);
        assert!(matches!(result, Err(OpenError::Authentication)));
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let salt = common::params::KEY_SALT;
        let key = crate::kdf::derive_key("password", &salt, 1_000).unwrap();
        let other = crate::kdf::derive_key("a different secret", &salt, 1_000).unwrap();
        let package = seal(&key, &sample_record()).unwrap();
        let result: Result<TelemetryRecord, _> = open(&other, &package);
        assert!(matches!(result, Err(OpenError::Authentication)));
    }

    #[test]
    fn malformed_package_is_rejected_before_decryption() {
        let key = test_key();
        let mut package = seal(&key, &sample_record()).unwrap();
        package.nonce = "%%%".into();
        let result: Result<TelemetryRecord, _> = open(&key, &package);
        assert!(matches!(result, Err(OpenError::Malformed(_))));
    }

    #[test]
    fn truncated_nonce_is_rejected() {
        let key = test_key();
        let mut package = seal(&key, &sample_record()).unwrap();
        package.nonce = STANDARD.encode([0u8; NONCE_LEN - 1]);
        let result: Result<TelemetryRecord, _> = open(&key, &package);
        assert!(matches!(
            result,
            Err(OpenError::Malformed(PackageError::InvalidNonceLength(_)))
        ));
    }

    #[test]
    fn authenticated_but_unparseable_plaintext_is_a_deserialization_error() {
        let key = test_key();
        // A valid seal of a JSON number authenticates fine but cannot
        // deserialize into a TelemetryRecord.
        let package = seal(&key, &json!(42)).unwrap();
        let result: Result<TelemetryRecord, _> = open(&key, &package);
        assert!(matches!(result, Err(OpenError::Deserialization(_))));
    }

    #[test]
    fn empty_record_round_trips() {
        let key = test_key();
        let record = json!({});
        let package = seal(&key, &record).unwrap();
        let opened: Value = open(&key, &package).unwrap();
        assert_eq!(opened, record);
    }
}
