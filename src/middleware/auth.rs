use axum::RequestPartsExt;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::router::AppState;

/// Identity view handed to protected handlers once the bearer token checks
/// out. The credential hash never leaves the auth gate.
///
/// Extraction walks missing-header -> bad-token -> unknown-subject in order;
/// every failure collapses into the same 401 so a caller cannot probe which
/// check tripped.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub username: String,
    pub full_name: Option<String>,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);

        let bearer = match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
            Ok(TypedHeader(Authorization(bearer))) => bearer,
            Err(_) => return Err(reject("missing or malformed authorization header")),
        };

        let claims = match app.tokens.verify(bearer.token()) {
            Ok(claims) => claims,
            Err(reason) => return Err(reject(&format!("token rejected: {reason}"))),
        };

        let user = match app.users.find_by_username(&claims.sub).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(reject("token subject does not match a known user")),
            Err(e) => return Err(e.into_response()),
        };

        Ok(Self {
            username: user.username,
            full_name: user.full_name,
        })
    }
}

fn reject(cause: &str) -> Response {
    debug!(cause, "rejected bearer credentials");
    ApiError::Unauthorized.into_response()
}
