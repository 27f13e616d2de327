use {
    crate::error::CryptoDecodeError,
    blst::min_pk,
    std::fmt,
};

pub const PUBLIC_KEY_BYTE_SIZE: usize = 48;

/// A single BLS12-381 G1 public key.
///
/// This struct is a thin wrapper upon `blst`'s public key type so callers
/// never need to reach into the `blst` crate directly.
#[derive(Clone)]
pub struct PublicKey(min_pk::PublicKey);

impl PublicKey {
    /// Deserialize a public key from its 48-byte compressed form.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, CryptoDecodeError> {
        min_pk::PublicKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| CryptoDecodeError::InvalidPublicKey)
    }

    /// Parse a `0x`-prefixed (or bare) hex string into a public key.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoDecodeError> {
        let trimmed = hex_str.trim().trim_start_matches("0x");
        let bytes =
            hex::decode(trimmed).map_err(|e| CryptoDecodeError::InvalidHex(e.to_string()))?;
        Self::deserialize(&bytes)
    }

    pub(crate) fn raw(&self) -> &min_pk::PublicKey {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey(0x{})", hex::encode(self.0.compress()))
    }
}
