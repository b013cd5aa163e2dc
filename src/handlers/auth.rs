//! Login and the endpoints demonstrating the auth gate.

use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::auth::password;
use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::router::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// POST /login — form credentials in, bearer token out. Unknown usernames
/// and wrong passwords are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Some(user) = state.users.find_by_username(&form.username).await? else {
        debug!(username = %form.username, "login attempt for unknown username");
        return Err(ApiError::Unauthorized);
    };

    // Argon2 verification is CPU-bound; run it on the worker pool so the
    // dispatch threads stay free.
    let stored = user.password_hash.clone();
    let submitted = form.password;
    let matched = state
        .workers
        .run(move || password::verify(&stored, &submitted))
        .await??;
    if !matched {
        debug!(username = %user.username, "login attempt with wrong password");
        return Err(ApiError::Unauthorized);
    }

    let token = state.tokens.issue(&user.username)?;
    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer",
    }))
}

/// GET /public
pub async fn public() -> Json<Value> {
    Json(json!({ "message": "This data is available to anyone." }))
}

/// GET /protected — the auth gate runs in the `CurrentUser` extractor.
pub async fn protected(user: CurrentUser) -> Json<Value> {
    Json(json!({
        "message": "This data requires a verified identity.",
        "user": user.username,
    }))
}
