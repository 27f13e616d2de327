//! C1: batch request validation and payload decoding.
//!
//! Every item is checked independently; a failing item is dropped and logged
//! at DEBUG, it never aborts the batch. The caller (C5) is responsible for
//! treating an empty result as `NoValidRequests`.

use {
    crate::types::{DecodedPayload, DecodedSignature, SubmittedSignature, PAYLOAD_PLATFORM, PAYLOAD_TYPE},
    base64::Engine,
    chrono::{DateTime, Duration, Utc},
};

const SIGNATURE_HEX_LEN: usize = 194; // "0x" + 96 bytes * 2 hex chars
const PUBKEY_HEX_LEN: usize = 98; // "0x" + 48 bytes * 2 hex chars
const MAX_PAYLOAD_AGE: Duration = Duration::days(30);

/// Validate and decode an entire batch, dropping invalid items in place.
pub fn decode_and_validate_batch(
    requests: Vec<SubmittedSignature>,
    now: DateTime<Utc>,
) -> Vec<DecodedSignature> {
    requests
        .into_iter()
        .filter_map(|req| match decode_and_validate_one(&req, now) {
            Ok(decoded) => Some(decoded),
            Err(reason) => {
                log::debug!(
                    "dropping signature from request, {reason} (pubkey={})",
                    req.pubkey
                );
                None
            }
        })
        .collect()
}

fn decode_and_validate_one(
    req: &SubmittedSignature,
    now: DateTime<Utc>,
) -> Result<DecodedSignature, &'static str> {
    if req.network.is_empty()
        || req.tag.is_empty()
        || req.signature.is_empty()
        || req.payload.is_empty()
        || req.pubkey.is_empty()
    {
        return Err("missing required field");
    }

    if req.signature.len() != SIGNATURE_HEX_LEN || !req.signature.starts_with("0x") {
        return Err("invalid signature format");
    }

    if req.pubkey.len() != PUBKEY_HEX_LEN || !req.pubkey.starts_with("0x") {
        return Err("invalid pubkey format");
    }
    if hex::decode(&req.pubkey[2..]).is_err() {
        return Err("pubkey is not valid hex");
    }

    let decoded_bytes = base64::engine::general_purpose::STANDARD
        .decode(&req.payload)
        .map_err(|_| "payload is not valid base64")?;

    let decoded_payload: DecodedPayload =
        serde_json::from_slice(&decoded_bytes).map_err(|_| "payload is not valid JSON")?;

    if decoded_payload.platform != PAYLOAD_PLATFORM {
        return Err("unexpected platform");
    }
    if decoded_payload.kind != PAYLOAD_TYPE {
        return Err("unexpected payload type");
    }

    if decoded_payload.timestamp.is_empty() {
        return Err("missing timestamp");
    }
    let timestamp_ms: i64 = decoded_payload
        .timestamp
        .parse()
        .map_err(|_| "timestamp is not a decimal integer")?;
    let signed_at =
        DateTime::<Utc>::from_timestamp_millis(timestamp_ms).ok_or("timestamp out of range")?;
    if now - signed_at > MAX_PAYLOAD_AGE {
        return Err("payload is older than 30 days");
    }

    Ok(DecodedSignature {
        payload: req.payload.clone(),
        pubkey: req.pubkey.clone(),
        signature: req.signature.clone(),
        tag: req.tag.clone(),
        decoded_payload,
    })
}
