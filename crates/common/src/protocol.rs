//! Wire types exchanged between senders and viewers.
//!
//! These types are serialised as JSON. [`SealedPackage`] is the only thing a
//! sender ever transmits; the telemetry types describe the plaintext payload
//! that rides inside it. Field names are part of the wire contract and must
//! not change.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::PackageError;
use crate::params::{NONCE_LEN, TAG_LEN};

// ---------------------------------------------------------------------------
// Sealed package
// ---------------------------------------------------------------------------

/// An encrypted telemetry message as it appears on the wire.
///
/// ```text
/// {
///   "ciphertext": "<base64>",
///   "nonce":      "<base64, decodes to exactly 12 bytes>",
///   "auth_tag":   "<base64, decodes to exactly 16 bytes>"
/// }
/// ```
///
/// All three parts use the standard padded base64 alphabet. The nonce and tag
/// are not secret; only the key is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedPackage {
    /// Base64-encoded AES-GCM ciphertext (same length as the plaintext).
    pub ciphertext: String,
    /// Base64-encoded 12-byte nonce, freshly random per message.
    pub nonce: String,
    /// Base64-encoded 16-byte GCM authentication tag.
    pub auth_tag: String,
}

/// The raw byte parts of a package, after base64 decoding and length checks.
#[derive(Debug, Clone)]
pub struct DecodedParts {
    /// Raw ciphertext bytes.
    pub ciphertext: Vec<u8>,
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw authentication tag bytes.
    pub auth_tag: [u8; TAG_LEN],
}

impl SealedPackage {
    /// Assemble a package from raw cipher output.
    ///
    /// Fixed-size nonce and tag parameters make it impossible to build a
    /// package with the wrong part lengths.
    pub fn from_parts(
        ciphertext: &[u8],
        nonce: &[u8; NONCE_LEN],
        auth_tag: &[u8; TAG_LEN],
    ) -> Self {
        Self {
            ciphertext: STANDARD.encode(ciphertext),
            nonce: STANDARD.encode(nonce),
            auth_tag: STANDARD.encode(auth_tag),
        }
    }

    /// Decode all three parts back to raw bytes, validating lengths.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError`] if any field is not valid base64, or if the
    /// decoded nonce or tag has the wrong length. Ciphertext length is not
    /// constrained here; the tag check during decryption covers it.
    pub fn decode(&self) -> Result<DecodedParts, PackageError> {
        let ciphertext = STANDARD
            .decode(&self.ciphertext)
            .map_err(|_| PackageError::InvalidBase64("ciphertext"))?;

        let nonce_bytes = STANDARD
            .decode(&self.nonce)
            .map_err(|_| PackageError::InvalidBase64("nonce"))?;
        let nonce: [u8; NONCE_LEN] = nonce_bytes
            .as_slice()
            .try_into()
            .map_err(|_| PackageError::InvalidNonceLength(nonce_bytes.len()))?;

        let tag_bytes = STANDARD
            .decode(&self.auth_tag)
            .map_err(|_| PackageError::InvalidBase64("auth_tag"))?;
        let auth_tag: [u8; TAG_LEN] = tag_bytes
            .as_slice()
            .try_into()
            .map_err(|_| PackageError::InvalidTagLength(tag_bytes.len()))?;

        Ok(DecodedParts {
            ciphertext,
            nonce,
            auth_tag,
        })
    }
}

// ---------------------------------------------------------------------------
// Telemetry payload
// ---------------------------------------------------------------------------

/// Severity profile of a patient's vitals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageMode {
    /// Vitals within normal ranges.
    Stable,
    /// Elevated vitals needing attention.
    Urgent,
    /// Vitals outside survivable-without-intervention ranges.
    Critical,
}

/// One vital-signs reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Beats per minute.
    pub heart_rate: u32,
    /// Blood oxygen saturation, percent.
    #[serde(rename = "spO2")]
    pub sp_o2: u32,
    /// Body temperature, degrees Celsius.
    pub temperature: f64,
}

/// The plaintext telemetry record a sender seals once per interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Identifier of the sending unit.
    pub ambulance_id: String,
    /// Patient display name.
    pub patient_name: String,
    /// Current vital signs.
    pub vitals: Vitals,
    /// Severity profile the vitals were generated under.
    pub mode: TriageMode,
    /// Unix timestamp, seconds (fractional).
    pub timestamp: f64,
}
