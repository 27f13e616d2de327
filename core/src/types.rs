//! Domain types shared by every component: the closed `Network` enum, the
//! tri-state `Status`, the wire/decoded payload shapes, and the stored record.

use serde::{Deserialize, Serialize};

/// Closed enumeration of supported consensus-layer networks.
///
/// Every persisted record carries exactly one network, and every beacon-node
/// endpoint is keyed by one network. Unlike [`Tag`], this is not open: an
/// unrecognised network string is a 400, not a new partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Holesky,
    Gnosis,
    Lukso,
}

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Mainnet,
        Network::Holesky,
        Network::Gnosis,
        Network::Lukso,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Holesky => "holesky",
            Network::Gnosis => "gnosis",
            Network::Lukso => "lukso",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mainnet" => Some(Network::Mainnet),
            "holesky" => Some(Network::Holesky),
            "gnosis" => Some(Network::Gnosis),
            "lukso" => Some(Network::Lukso),
            _ => None,
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator-chosen grouping label. Free-form: the server never validates that
/// a tag is "known" on write, only that the caller's JWT authorises it on read.
pub type Tag = String;

/// Tri-state status of a stored record's underlying validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Unknown,
    Active,
    Inactive,
}

/// The object a validator actually signs, byte-for-byte as canonical JSON with
/// keys in this exact order: `type`, `platform`, `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub platform: String,
    pub timestamp: String,
}

pub const PAYLOAD_TYPE: &str = "PROOF_OF_VALIDATION";
pub const PAYLOAD_PLATFORM: &str = "dappnode";

/// The input unit of a `POST /signatures` batch, exactly as submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedSignature {
    pub payload: String,
    pub pubkey: String,
    pub signature: String,
    pub network: String,
    pub tag: String,
}

/// A submitted signature that has passed every C1 check, with its payload
/// decoded and its fields otherwise untouched.
#[derive(Debug, Clone)]
pub struct DecodedSignature {
    pub payload: String,
    pub pubkey: String,
    pub signature: String,
    pub tag: Tag,
    pub decoded_payload: DecodedPayload,
}

/// A [`DecodedSignature`] with the validator status C2 resolved for it.
#[derive(Debug, Clone)]
pub struct StatusedSignature {
    pub signature: DecodedSignature,
    pub status: Status,
}

/// One element of a stored record's `entries` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub payload: String,
    pub signature: String,
    #[serde(rename = "decodedPayload")]
    pub decoded_payload: DecodedPayload,
}

/// The store's unit of persistence, keyed by `(pubkey, tag, network)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub pubkey: String,
    pub tag: Tag,
    pub network: Network,
    pub status: Status,
    pub entries: Vec<Entry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_round_trips_through_json() {
        for network in Network::ALL {
            let json = serde_json::to_string(&network).unwrap();
            let parsed: Network = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, network);
            assert_eq!(Network::parse(network.as_str()), Some(network));
        }
    }

    #[test]
    fn unknown_network_string_does_not_parse() {
        assert_eq!(Network::parse("sepolia"), None);
    }

    #[test]
    fn decoded_payload_serialises_in_declared_field_order() {
        let payload = DecodedPayload {
            kind: PAYLOAD_TYPE.to_string(),
            platform: PAYLOAD_PLATFORM.to_string(),
            timestamp: "1700000000000".to_string(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"type":"PROOF_OF_VALIDATION","platform":"dappnode","timestamp":"1700000000000"}"#
        );
    }
}
