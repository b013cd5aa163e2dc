pub mod auth;
pub mod bridge;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod store;
pub mod validate;

pub use error::ApiError;
pub use router::{AppState, app_router};
