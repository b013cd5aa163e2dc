use axum::Json;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::validate;

#[derive(Debug, Deserialize)]
pub struct ProfileSubmission {
    pub username: String,
    pub user_id: i64,
    pub bio: String,
}

/// POST /profile — free-text input is sanitized before acceptance; hostile
/// payloads are rejected with a 400 rather than silently rewritten.
pub async fn create_profile(Json(body): Json<ProfileSubmission>) -> Result<Json<Value>, ApiError> {
    validate::username(&body.username)?;
    let bio = validate::bio(&body.bio)?;
    Ok(Json(json!({
        "message": "profile created",
        "username": body.username,
        "user_id": body.user_id,
        "bio_length": bio.chars().count(),
    })))
}
