//! AES-128-GCM seal/open envelope for telemetry records.
//!
//! This module is intentionally free of configuration and transport
//! dependencies. It provides the two operations everything else is glue
//! around: serialize-and-encrypt on the sending side, and
//! authenticate-decrypt-deserialize on the receiving side.
//!
//! # Package format
//!
//! ```text
//! { "ciphertext": <b64>, "nonce": <b64, 12 bytes>, "auth_tag": <b64, 16 bytes> }
//! ```
//!
//! The nonce is drawn fresh from the OS CSPRNG on every seal. It must never
//! repeat under a given key — GCM nonce reuse breaks both confidentiality
//! and authentication.

pub mod cipher;

pub use cipher::{open, seal, OpenError, SealError};
