use thiserror::Error;

/// Failure modes of decoding or verifying a BLS public key / signature.
///
/// These never indicate "signature does not verify" — a failed verification is
/// represented as `Ok(false)`, not an error. These are reserved for malformed
/// input that cannot even be turned into curve points.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoDecodeError {
    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("public key is not a valid compressed BLS12-381 G1 point")]
    InvalidPublicKey,

    #[error("signature is not a valid compressed BLS12-381 G2 point")]
    InvalidSignature,
}
