//! C3: BLS signature verification over the re-serialised decoded payload.

use {
    crate::types::DecodedSignature,
    validator_monitoring_bls::{CryptoDecodeError, PublicKey, Signature},
};

/// Verify a decoded signature's cryptographic validity.
///
/// The message verified is the canonical JSON re-serialisation of
/// `decoded_payload` (field order `type`, `platform`, `timestamp`) — the exact
/// bytes the signer produced, not the raw base64-decoded payload. A malformed
/// pubkey/signature is a [`CryptoDecodeError`]; a well-formed but
/// cryptographically invalid pair is `Ok(false)`, never an error.
pub fn verify(item: &DecodedSignature) -> Result<bool, CryptoDecodeError> {
    let pubkey = PublicKey::from_hex(&item.pubkey)?;
    let signature = Signature::from_hex(&item.signature)?;
    let message = serde_json::to_vec(&item.decoded_payload)
        .expect("DecodedPayload serialisation is infallible");
    Ok(signature.verify(&message, &pubkey))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::types::{DecodedPayload, PAYLOAD_PLATFORM, PAYLOAD_TYPE},
        blst::min_pk::SecretKey,
    };

    const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

    fn signed_item(ikm: [u8; 32], tamper_message: bool) -> DecodedSignature {
        let sk = SecretKey::key_gen(&ikm, &[]).unwrap();
        let pk = sk.sk_to_pk();
        let decoded_payload = DecodedPayload {
            kind: PAYLOAD_TYPE.to_string(),
            platform: PAYLOAD_PLATFORM.to_string(),
            timestamp: "1700000000000".to_string(),
        };
        let message = serde_json::to_vec(&decoded_payload).unwrap();
        let signed_message: Vec<u8> = if tamper_message {
            b"not the same bytes".to_vec()
        } else {
            message
        };
        let sig = sk.sign(&signed_message, DST, &[]);

        DecodedSignature {
            payload: "irrelevant".to_string(),
            pubkey: format!("0x{}", hex::encode(pk.to_bytes())),
            signature: format!("0x{}", hex::encode(sig.to_bytes())),
            tag: "solo".to_string(),
            decoded_payload,
        }
    }

    #[test]
    fn verifies_a_genuine_signature() {
        let item = signed_item([1u8; 32], false);
        assert_eq!(verify(&item), Ok(true));
    }

    #[test]
    fn rejects_signature_over_a_different_message() {
        let item = signed_item([1u8; 32], true);
        assert_eq!(verify(&item), Ok(false));
    }

    #[test]
    fn malformed_pubkey_is_a_decode_error() {
        let mut item = signed_item([1u8; 32], false);
        item.pubkey = "0xnothex".to_string();
        assert!(verify(&item).is_err());
    }
}
