//! BLS12-381 verification for dappnode-style proof-of-validation signatures.
//!
//! Wraps `blst` so callers work with plain byte/hex APIs and never reach for
//! curve-level types directly. The signature scheme is fixed to Ethereum's
//! proof-of-possession ciphersuite (the "ETH2 Draft 07" domain separation mode);
//! there is no per-call choice of domain, matching the upstream service this
//! crate mirrors.

mod error;
mod public_key;
mod signature;

pub use {
    error::CryptoDecodeError,
    public_key::{PublicKey, PUBLIC_KEY_BYTE_SIZE},
    signature::{Signature, SIGNATURE_BYTE_SIZE},
};

use std::sync::Once;

static INIT: Once = Once::new();

/// Run the one-time BLS backend initialisation.
///
/// `blst` has no mutable global state to configure (the domain separation tag
/// is fixed at the call site in [`Signature::verify`]), but the precondition is
/// kept as an explicit, idempotent step so startup still has a single place to
/// fail fast if the crypto backend is unusable, and so the precondition in the
/// design is testable rather than assumed.
pub fn init() {
    INIT.call_once(|| {
        // Self-test: sign and verify a fixed vector. A panic here means the
        // BLS backend is broken in a way no later request could recover from.
        let sk = blst::min_pk::SecretKey::key_gen(&[0x42; 32], &[])
            .expect("blst secret key generation failed");
        let pk = sk.sk_to_pk();
        let msg = b"validator-monitoring-bls-self-test";
        let sig = sk.sign(msg, b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_", &[]);
        assert_eq!(
            sig.verify(true, msg, b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_", &[], &pk, true),
            blst::BLST_ERROR::BLST_SUCCESS,
            "BLS self-test failed"
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        init();
    }
}
