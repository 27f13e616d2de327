//! C11: the single conversion point from `ServiceError` (or a lower-level
//! warp rejection) into an HTTP status and plain-text body.
//!
//! This is the only place in the service that maps error variant to status
//! code — everywhere else just propagates a `ServiceError` or a `Rejection`.

use {
    std::convert::Infallible,
    validator_monitoring_core::ServiceError,
    warp::{
        http::StatusCode,
        reject::{MissingHeader, Reject},
        Rejection, Reply,
    },
};

impl Reject for ServiceError {}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, body) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(service_err) = err.find::<ServiceError>() {
        map_service_error(service_err)
    } else if err.find::<warp::filters::body::BodyDeserializeError>().is_some() {
        (StatusCode::BAD_REQUEST, "invalid request".to_string())
    } else if err.find::<MissingHeader>().is_some() {
        (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
    } else {
        log::error!("unhandled rejection: {err:?}");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
    };

    Ok(warp::reply::with_status(body, status))
}

fn map_service_error(err: &ServiceError) -> (StatusCode, String) {
    match err {
        ServiceError::InvalidRequest(_)
        | ServiceError::InvalidNetwork
        | ServiceError::NoValidRequests
        | ServiceError::NoValidSignatures => {
            log::info!("{err}");
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        ServiceError::Unauthorized => {
            // Never leak which check failed (missing header, bad signature,
            // unknown kid, empty tags all land here alike).
            (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
        }
        ServiceError::DocumentFull(_) => {
            log::error!("{err}");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        ServiceError::BeaconError(_) | ServiceError::StoreError(_) | ServiceError::InvalidInput(_) => {
            log::error!("{err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
        }
    }
}
