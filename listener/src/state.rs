//! Shared, cloneable state threaded through every warp filter.

use {
    std::{collections::HashMap, path::PathBuf, sync::Arc},
    validator_monitoring_core::{store::SignatureStore, types::Network},
};

/// Everything a route handler needs, beyond its own request data.
///
/// `SignatureStore` and `reqwest::Client` are themselves cheap to clone
/// (pooled handles), so this whole struct is wrapped once in an `Arc` and
/// shared by value with `warp::any().map(move || state.clone())`, matching
/// the teacher's own `Arc`-through-filters pattern.
#[derive(Clone)]
pub struct AppState {
    pub store: SignatureStore,
    pub http_client: reqwest::Client,
    pub beacon_urls: Arc<HashMap<Network, String>>,
    pub max_entries_per_bson: u32,
    pub jwt_users_file_path: Arc<PathBuf>,
}
