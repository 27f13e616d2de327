//! Request handlers for the three HTTP routes. Each one is thin glue: parse
//! what warp hands it, call into `validator_monitoring_core`, convert the
//! result into a reply or a rejection.

use {
    crate::state::AppState,
    serde::Deserialize,
    std::sync::Arc,
    validator_monitoring_core::{auth, orchestrator, reader, types::Network, ServiceError},
    warp::{http::StatusCode, reply::Reply, Rejection},
};

#[derive(Debug, Deserialize)]
pub struct NetworkQuery {
    pub network: Option<String>,
}

pub async fn post_signatures(
    query: NetworkQuery,
    body: Vec<validator_monitoring_core::types::SubmittedSignature>,
    state: Arc<AppState>,
) -> Result<impl Reply, Rejection> {
    let network = query
        .network
        .as_deref()
        .and_then(Network::parse)
        .ok_or(ServiceError::InvalidNetwork)
        .map_err(warp::reject::custom)?;

    let summary = orchestrator::ingest_batch(
        &state.store,
        &state.http_client,
        &state.beacon_urls,
        network,
        body,
        state.max_entries_per_bson,
    )
    .await
    .map_err(warp::reject::custom)?;

    log::info!(
        "ingested batch on {network}: persisted={} dropped_inactive={} dropped_crypto={}",
        summary.persisted,
        summary.dropped_inactive,
        summary.dropped_crypto
    );

    Ok(warp::reply::with_status(
        "Finished processing signatures",
        StatusCode::OK,
    ))
}

pub async fn get_signatures(
    authorization: Option<String>,
    state: Arc<AppState>,
) -> Result<impl Reply, Rejection> {
    let header = authorization.ok_or(ServiceError::Unauthorized).map_err(warp::reject::custom)?;
    let token = auth::extract_bearer_token(&header)
        .ok_or(ServiceError::Unauthorized)
        .map_err(warp::reject::custom)?;

    let tags = auth::authorise(token, &state.jwt_users_file_path)
        .await
        .map_err(warp::reject::custom)?;

    let records = reader::records_for_tags(&state.store, &tags)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&records))
}
