use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One-way commitment to a human-entered identifier: the SHA-256 digest of
/// its UTF-8 bytes, read as a big-endian unsigned integer and rendered in
/// decimal. This value, never the raw identifier, is what gets stored as a
/// secret share.
///
/// Equal identifiers always commit to the same value; recovering the
/// identifier requires a pre-image search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierCommitment(String);

pub fn commit(identifier: &str) -> IdentifierCommitment {
    let digest = Sha256::digest(identifier.as_bytes());
    IdentifierCommitment(BigUint::from_bytes_be(&digest).to_str_radix(10))
}

impl IdentifierCommitment {
    /// Decimal rendering, suitable as an unsigned-integer secret value.
    pub fn value(&self) -> &str {
        &self.0
    }
}
