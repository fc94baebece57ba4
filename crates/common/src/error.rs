//! Common error types shared across crates.

use thiserror::Error;

use crate::params::{NONCE_LEN, TAG_LEN};

/// A received package could not even be parsed into its three raw parts.
///
/// Distinct from an authentication failure: a malformed package never reaches
/// the cipher. Receivers drop the package either way — resending the same
/// bytes will fail identically, so none of these are retryable.
#[derive(Debug, Error)]
pub enum PackageError {
    /// One of the three base64 fields did not decode.
    #[error("package field `{0}` is not valid base64")]
    InvalidBase64(&'static str),

    /// The decoded nonce is not exactly [`NONCE_LEN`] bytes.
    #[error("nonce has invalid length: expected {NONCE_LEN} bytes, got {0}")]
    InvalidNonceLength(usize),

    /// The decoded authentication tag is not exactly [`TAG_LEN`] bytes.
    #[error("auth tag has invalid length: expected {TAG_LEN} bytes, got {0}")]
    InvalidTagLength(usize),
}
