use {
    crate::{error::CryptoDecodeError, public_key::PublicKey},
    blst::{min_pk, BLST_ERROR},
};

pub const SIGNATURE_BYTE_SIZE: usize = 96;

/// Ethereum's BLS signature domain separation tag (the "ETH2 Draft 07" ciphersuite).
///
/// This is the proof-of-possession minimal-pubkey-size ciphersuite used across the
/// consensus layer. It must be identical on both the signing and verifying side.
const DOMAIN_SEPARATION_TAG: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// A single BLS12-381 G2 signature.
#[derive(Clone)]
pub struct Signature(min_pk::Signature);

impl Signature {
    /// Deserialize a signature from its 96-byte compressed form.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, CryptoDecodeError> {
        min_pk::Signature::from_bytes(bytes)
            .map(Self)
            .map_err(|_| CryptoDecodeError::InvalidSignature)
    }

    /// Parse a `0x`-prefixed (or bare) hex string into a signature.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoDecodeError> {
        let trimmed = hex_str.trim().trim_start_matches("0x");
        let bytes =
            hex::decode(trimmed).map_err(|e| CryptoDecodeError::InvalidHex(e.to_string()))?;
        Self::deserialize(&bytes)
    }

    /// Verify this signature over `message` against `pubkey`, using Ethereum's
    /// domain separation tag. Equivalent to `Sign.VerifyByte(Pub, message)`.
    ///
    /// Returns `false` on a cryptographically invalid signature; never errors for
    /// that case (only malformed-at-construction keys/signatures are errors, and
    /// those are rejected earlier by `deserialize`/`from_hex`).
    pub fn verify(&self, message: &[u8], pubkey: &PublicKey) -> bool {
        let err = self
            .0
            .verify(true, message, DOMAIN_SEPARATION_TAG, &[], pubkey.raw(), true);
        err == BLST_ERROR::BLST_SUCCESS
    }
}
