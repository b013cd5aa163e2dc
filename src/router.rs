use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::auth::token::TokenService;
use crate::bridge::WorkerPool;
use crate::cache::ResponseCache;
use crate::handlers;
use crate::middleware::request_log::log_requests;
use crate::store::{ItemStore, UserStore};

/// Shared application state. Stores are held behind their port traits so the
/// router works identically over SQLite or the in-memory adapter.
#[derive(Clone)]
pub struct AppState {
    pub items: Arc<dyn ItemStore>,
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<TokenService>,
    pub workers: WorkerPool,
    pub cache: Arc<ResponseCache>,
}

impl AppState {
    pub fn new(
        items: Arc<dyn ItemStore>,
        users: Arc<dyn UserStore>,
        tokens: TokenService,
        workers: WorkerPool,
        cache: ResponseCache,
    ) -> Self {
        Self {
            items,
            users,
            tokens: Arc::new(tokens),
            workers,
            cache: Arc::new(cache),
        }
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::pages::home))
        .route(
            "/items",
            post(handlers::items::create_item).get(handlers::items::list_items),
        )
        .route(
            "/items/{id}",
            get(handlers::items::get_item)
                .patch(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        )
        .route("/login", post(handlers::auth::login))
        .route("/public", get(handlers::auth::public))
        .route("/protected", get(handlers::auth::protected))
        .route("/profile", post(handlers::profile::create_profile))
        .route("/info", get(handlers::meta::info))
        .route("/stats", get(handlers::meta::stats))
        .layer(axum_middleware::from_fn(log_requests))
        .with_state(state)
}
