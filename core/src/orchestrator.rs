//! C5: the `POST /signatures` pipeline — composes C1 through C4 for one batch.

use {
    crate::{
        beacon,
        decode,
        error::{ServiceError, ServiceResult},
        store::SignatureStore,
        types::{Network, Status, SubmittedSignature},
        verify,
    },
    chrono::Utc,
    std::collections::{HashMap, HashSet},
};

/// Outcome of a successful ingest, surfaced to the caller as counters for
/// logging; the HTTP layer only cares that it's `Ok`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub persisted: u32,
    pub dropped_inactive: u32,
    pub dropped_crypto: u32,
}

/// Run the full ingest pipeline for one batch against `network`.
///
/// `beacon_urls` maps every configured [`Network`] to its beacon base URL;
/// an unresolvable network is the caller's responsibility to check before
/// calling this (see the `listener` crate's route, which maps that straight
/// to `InvalidNetwork` without ever reaching here).
pub async fn ingest_batch(
    store: &SignatureStore,
    client: &reqwest::Client,
    beacon_urls: &HashMap<Network, String>,
    network: Network,
    requests: Vec<SubmittedSignature>,
    max_entries: u32,
) -> ServiceResult<IngestSummary> {
    let decoded = decode::decode_and_validate_batch(requests, Utc::now());
    if decoded.is_empty() {
        return Err(ServiceError::NoValidRequests);
    }

    let beacon_url = beacon_urls
        .get(&network)
        .ok_or(ServiceError::InvalidNetwork)?;

    let pubkeys: Vec<String> = {
        let mut seen = HashSet::new();
        decoded
            .iter()
            .map(|item| item.pubkey.clone())
            .filter(|pubkey| seen.insert(pubkey.clone()))
            .collect()
    };

    let statuses = beacon::get_validators_status(client, beacon_url, &pubkeys).await?;

    let mut summary = IngestSummary::default();
    for item in decoded {
        let status = statuses.get(&item.pubkey).copied().unwrap_or(Status::Unknown);
        if status == Status::Inactive {
            log::warn!(
                "dropping signature for inactive validator pubkey={} tag={}",
                item.pubkey,
                item.tag
            );
            summary.dropped_inactive += 1;
            continue;
        }

        match verify::verify(&item) {
            Ok(true) => {}
            Ok(false) => {
                log::debug!(
                    "dropping signature that failed BLS verification pubkey={} tag={}",
                    item.pubkey,
                    item.tag
                );
                summary.dropped_crypto += 1;
                continue;
            }
            Err(err) => {
                log::debug!(
                    "dropping signature with undecodable crypto material pubkey={} tag={}: {err}",
                    item.pubkey,
                    item.tag
                );
                summary.dropped_crypto += 1;
                continue;
            }
        }

        store.append(&item, network, status, max_entries).await?;
        summary.persisted += 1;
    }

    if summary.persisted == 0 {
        return Err(ServiceError::NoValidSignatures);
    }

    Ok(summary)
}
