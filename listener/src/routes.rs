//! The warp filter tree: health route, write path, read path.

use {
    crate::{handlers, rejection, state::AppState},
    std::{convert::Infallible, sync::Arc},
    warp::{http::StatusCode, Filter, Rejection, Reply},
};

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

pub fn build(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let health = warp::get()
        .and(warp::path::end())
        .map(|| warp::reply::with_status("Server is running", StatusCode::OK));

    let post_signatures = warp::post()
        .and(warp::path("signatures"))
        .and(warp::path::end())
        .and(warp::query::<handlers::NetworkQuery>())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handlers::post_signatures);

    let get_signatures = warp::get()
        .and(warp::path("signatures"))
        .and(warp::path::end())
        .and(warp::header::optional::<String>("authorization"))
        .and(with_state(state))
        .and_then(handlers::get_signatures);

    health
        .or(post_signatures)
        .or(get_signatures)
        .recover(rejection::handle_rejection)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::{collections::HashMap, path::PathBuf},
        validator_monitoring_core::store::SignatureStore,
    };

    async fn test_state() -> Arc<AppState> {
        // The driver connects lazily, so constructing a client against an
        // unreachable URI is safe for routes that never touch the store.
        let client = mongodb::Client::with_uri_str("mongodb://127.0.0.1:1/unused")
            .await
            .expect("client construction does not connect eagerly");
        Arc::new(AppState {
            store: SignatureStore::new(&client),
            http_client: reqwest::Client::new(),
            beacon_urls: Arc::new(HashMap::new()),
            max_entries_per_bson: 30,
            jwt_users_file_path: Arc::new(PathBuf::from("/nonexistent/jwt-users.json")),
        })
    }

    #[tokio::test]
    async fn health_route_returns_running_message() {
        let routes = build(test_state().await);
        let resp = warp::test::request().path("/").reply(&routes).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body(), "Server is running");
    }

    #[tokio::test]
    async fn post_signatures_without_network_query_is_bad_request() {
        let routes = build(test_state().await);
        let resp = warp::test::request()
            .method("POST")
            .path("/signatures")
            .json(&Vec::<serde_json::Value>::new())
            .reply(&routes)
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn post_signatures_with_unknown_network_is_bad_request() {
        let routes = build(test_state().await);
        let resp = warp::test::request()
            .method("POST")
            .path("/signatures?network=sepolia")
            .json(&Vec::<serde_json::Value>::new())
            .reply(&routes)
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_signatures_without_authorization_header_is_unauthorized() {
        let routes = build(test_state().await);
        let resp = warp::test::request()
            .path("/signatures")
            .reply(&routes)
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.body(), "Unauthorized");
    }

    #[tokio::test]
    async fn get_signatures_with_malformed_bearer_scheme_is_unauthorized() {
        let routes = build(test_state().await);
        let resp = warp::test::request()
            .path("/signatures")
            .header("authorization", "Basic deadbeef")
            .reply(&routes)
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let routes = build(test_state().await);
        let resp = warp::test::request().path("/nope").reply(&routes).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
