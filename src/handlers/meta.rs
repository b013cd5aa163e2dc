use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, header};
use chrono::Utc;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::router::AppState;

const STATS_KEY: &str = "stats";

/// GET /info — echo connection metadata back to the caller.
pub async fn info(ConnectInfo(addr): ConnectInfo<SocketAddr>, headers: HeaderMap) -> Json<Value> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    Json(json!({
        "client_host": addr.ip().to_string(),
        "user_agent": user_agent,
    }))
}

/// GET /stats — item count served from the time-bucket cache; within a
/// bucket every caller sees the same body, including `generated_at`.
pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Some(cached) = state.cache.get(STATS_KEY) {
        return Ok(Json(cached));
    }
    let body = json!({
        "item_count": state.items.count().await?,
        "generated_at": Utc::now().to_rfc3339(),
    });
    state.cache.put(STATS_KEY, body.clone());
    Ok(Json(body))
}
