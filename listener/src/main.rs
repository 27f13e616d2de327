//! Process entry point: load configuration, wire the route tree, spawn the
//! background scheduler, bind the listener, and drive graceful shutdown.

mod config;
mod handlers;
mod rejection;
mod routes;
mod state;

use {
    config::Config,
    state::AppState,
    std::{collections::HashMap, sync::Arc, time::Duration},
    validator_monitoring_core::{reconciler, retainer, store::SignatureStore},
};

const RECONCILER_INTERVAL: Duration = Duration::from_secs(60);
const RETAINER_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => {
            init_logging(config.log_level.as_filter());
            config
        }
        Err(err) => {
            // Logging isn't initialised yet if config loading itself failed
            // (we need LOG_LEVEL from the environment to pick a filter), so
            // this one line goes straight to stderr.
            eprintln!("fatal: {err:#}");
            std::process::exit(1);
        }
    };

    validator_monitoring_bls::init();

    let mongo_client = match mongodb::Client::with_uri_str(&config.mongo_db_uri).await {
        Ok(client) => client,
        Err(err) => {
            log::error!("fatal: could not build MongoDB client: {err}");
            std::process::exit(1);
        }
    };

    let store = SignatureStore::new(&mongo_client);
    let beacon_urls = Arc::new(config.beacon_urls);
    let http_client = reqwest::Client::new();

    let state = Arc::new(AppState {
        store: store.clone(),
        http_client: http_client.clone(),
        beacon_urls: beacon_urls.clone(),
        max_entries_per_bson: config.max_entries_per_bson,
        jwt_users_file_path: Arc::new(config.jwt_users_file_path),
    });

    let reconciler_handle = spawn_reconciler(store.clone(), beacon_urls.clone(), http_client);
    let retainer_handle = spawn_retainer(store);

    let addr = ([0, 0, 0, 0], config.api_port);
    let routes = routes::build(state);
    let (socket_addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown(addr, shutdown_signal());
    log::info!("listening on {socket_addr}");

    let server_handle = tokio::spawn(server);
    match tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, server_handle).await {
        Ok(Ok(())) => log::info!("server drained cleanly"),
        Ok(Err(err)) => log::error!("server task panicked: {err}"),
        Err(_) => log::warn!("grace period elapsed before in-flight requests drained"),
    }

    reconciler_handle.abort();
    retainer_handle.abort();
}

fn spawn_reconciler(
    store: SignatureStore,
    beacon_urls: Arc<HashMap<validator_monitoring_core::types::Network, String>>,
    client: reqwest::Client,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RECONCILER_INTERVAL);
        loop {
            interval.tick().await;
            reconciler::run_once(&store, &beacon_urls, &client).await;
        }
    })
}

fn spawn_retainer(store: SignatureStore) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RETAINER_INTERVAL);
        loop {
            interval.tick().await;
            retainer::run_once(&store, chrono::Utc::now()).await;
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("shutdown signal received, draining in-flight requests");
}

fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::new().filter_level(level).init();
}
