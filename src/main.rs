use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pricebook::auth::password;
use pricebook::auth::token::TokenService;
use pricebook::bridge::WorkerPool;
use pricebook::cache::ResponseCache;
use pricebook::config::CONFIG;
use pricebook::db::SqliteStorage;
use pricebook::error::ApiError;
use pricebook::router::{AppState, app_router};
use pricebook::store::{NewUser, UserStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &*CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel
    );

    let storage = SqliteStorage::connect(&cfg.database_url).await?;
    let workers = WorkerPool::new(cfg.worker_slots);

    seed_user(&storage, &workers).await?;

    let storage = Arc::new(storage);
    let state = AppState::new(
        storage.clone(),
        storage,
        TokenService::new(&cfg.secret_key, cfg.token_ttl_minutes),
        workers,
        ResponseCache::new(Duration::from_secs(cfg.stats_cache_secs)),
    );
    let app = app_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install ctrl-c handler");
    }
    info!("shutdown signal received");
}

/// Create the bootstrap identity when the user table is empty and seed
/// credentials are configured.
async fn seed_user(storage: &SqliteStorage, workers: &WorkerPool) -> Result<(), ApiError> {
    let cfg = &*CONFIG;
    let (Some(username), Some(seed_password)) =
        (cfg.seed_username.clone(), cfg.seed_password.clone())
    else {
        return Ok(());
    };
    if UserStore::count(storage).await? > 0 {
        return Ok(());
    }

    let hash = workers.run(move || password::hash(&seed_password)).await??;
    let user = UserStore::create(
        storage,
        NewUser {
            username,
            password_hash: hash,
            full_name: cfg.seed_full_name.clone(),
            email: cfg.seed_email.clone(),
        },
    )
    .await?;
    info!(username = %user.username, "seeded initial user");
    Ok(())
}
