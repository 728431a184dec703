use std::{
    fmt::{Debug, Display, LowerHex},
    ops::Deref,
    str::FromStr,
};

use hex::FromHexError;
use sha1::{Digest as _, Sha1};
use tap::Tap;

/// The identifier of an object in the store: the SHA-1 of its header and contents.
///
/// Digests are plain values. Two digests are equal exactly when their bytes are.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Digest(pub [u8; 20]);

impl Digest {
    /// Number of hex characters in a formatted digest.
    pub const HEX_LEN: usize = 40;

    /// Hash a fully formatted object (`"{type} {len}\0{data}"`) and return its digest.
    ///
    /// Only used when writing loose objects; lookups never hash.
    pub fn new(bytes: &[u8]) -> Self {
        let fin = Sha1::new().chain_update(bytes).finalize();
        let mut out = [0; 20];
        out.copy_from_slice(&fin);
        Self(out)
    }

    /// Format the digest as a hex string.
    ///
    /// Identical to `format!("{:x}", self)`.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Shorten a Digest, usually for display purposes.
    ///
    /// Note: This doesn't check for collisions.
    pub fn short(&self) -> String {
        self.to_hex().tap_mut(|x| x.truncate(7))
    }
}

impl Deref for Digest {
    type Target = [u8; 20];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl LowerHex for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        if s.len() != Self::HEX_LEN {
            return Err(FromHexError::InvalidStringLength);
        }
        let mut out = [0; 20];
        hex::decode_to_slice(s, &mut out)?;
        Ok(Digest(out))
    }
}
