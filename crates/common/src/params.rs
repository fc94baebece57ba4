//! Crypto parameters shared bit-for-bit by every participant.
//!
//! All senders and viewers must agree on these values or no package will
//! authenticate. The salt is public — it only has to be fixed, not secret —
//! but changing it invalidates every previously derived key, so it lives
//! here and nowhere else.

/// Byte length of the derived AES-128 key (16 bytes = 128 bits).
pub const KEY_LEN: usize = 16;

/// Byte length of the PBKDF2 salt.
pub const SALT_LEN: usize = 16;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// PBKDF2-HMAC-SHA256 iteration count.
///
/// Raising this linearly increases both brute-force cost for an attacker and
/// key-derivation latency at startup. One million iterations keeps startup
/// around a second on current hardware.
pub const KDF_ITERATIONS: u32 = 1_000_000;

/// The fixed public salt, as bytes.
pub const KEY_SALT: [u8; SALT_LEN] = [
    0xaa, 0xfe, 0x23, 0x45, 0x67, 0x89, 0xde, 0xad, 0xbe, 0xef, 0x12, 0x34, 0x56, 0x78, 0x90, 0xab,
];

/// The fixed public salt, as the hex string used in configuration.
pub const KEY_SALT_HEX: &str = "aafe23456789deadbeef1234567890ab";
