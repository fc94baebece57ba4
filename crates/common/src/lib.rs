//! Common crypto parameters, wire protocol, and errors shared across `vitals-envelope` crates.
//!
//! Every sender and every viewer compiles against this crate, so the
//! parameters in [`params`] and the wire shape in [`protocol`] exist in
//! exactly one place. Changing the salt or iteration count here re-keys all
//! participants at once; there is no second copy to drift.

pub mod error;
pub mod params;
pub mod protocol;

pub use error::PackageError;
pub use protocol::SealedPackage;
