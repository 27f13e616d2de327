//! C2: bulk validator-status lookup against a beacon node.

use {
    crate::{
        error::{ServiceError, ServiceResult},
        types::Status,
    },
    serde::{Deserialize, Serialize},
    std::{collections::HashMap, time::Duration},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct ValidatorsRequest<'a> {
    ids: &'a [String],
    statuses: &'a [&'static str],
}

#[derive(Debug, Deserialize)]
struct ValidatorsResponse {
    data: Vec<ValidatorEntry>,
}

#[derive(Debug, Deserialize)]
struct ValidatorEntry {
    validator: ValidatorInfo,
}

#[derive(Debug, Deserialize)]
struct ValidatorInfo {
    pubkey: String,
}

fn normalize(pubkey: &str) -> String {
    pubkey.trim().trim_start_matches("0x").to_lowercase()
}

/// Query `beacon_url` for the active status of every pubkey in `pubkeys`.
///
/// Transport errors and 5xx responses degrade to "every pubkey is unknown"
/// rather than failing the caller — ingestion proceeds and the reconciler
/// retries later. Only a non-200, non-5xx response is a hard `BeaconError`.
pub async fn get_validators_status(
    client: &reqwest::Client,
    beacon_url: &str,
    pubkeys: &[String],
) -> ServiceResult<HashMap<String, Status>> {
    if pubkeys.is_empty() {
        return Err(ServiceError::InvalidInput(
            "pubkey set must not be empty".to_string(),
        ));
    }

    let url = format!("{}/eth/v1/beacon/states/head/validators", beacon_url.trim_end_matches('/'));
    let body = ValidatorsRequest {
        ids: pubkeys,
        statuses: &["active_ongoing"],
    };

    let response = client
        .post(&url)
        .timeout(REQUEST_TIMEOUT)
        .json(&body)
        .send()
        .await;

    let response = match response {
        Ok(resp) => resp,
        Err(err) => {
            log::warn!("beacon node unreachable at {url}: {err}");
            return Ok(all_unknown(pubkeys));
        }
    };

    let status = response.status();
    if status.is_server_error() {
        log::warn!("beacon node returned {status} for {url}");
        return Ok(all_unknown(pubkeys));
    }
    if !status.is_success() {
        return Err(ServiceError::BeaconError(format!(
            "beacon node returned unexpected status {status}"
        )));
    }

    let parsed: ValidatorsResponse = response
        .json()
        .await
        .map_err(|e| ServiceError::BeaconError(format!("invalid beacon response: {e}")))?;

    let active: std::collections::HashSet<String> = parsed
        .data
        .iter()
        .map(|entry| normalize(&entry.validator.pubkey))
        .collect();

    Ok(pubkeys
        .iter()
        .map(|pubkey| {
            let status = if active.contains(&normalize(pubkey)) {
                Status::Active
            } else {
                Status::Inactive
            };
            (pubkey.clone(), status)
        })
        .collect())
}

fn all_unknown(pubkeys: &[String]) -> HashMap<String, Status> {
    pubkeys
        .iter()
        .map(|pubkey| (pubkey.clone(), Status::Unknown))
        .collect()
}
