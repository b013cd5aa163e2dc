use askama::Template;
use axum::extract::State;
use axum::response::Html;
use chrono::Utc;

use crate::error::ApiError;
use crate::router::AppState;
use crate::store::Item;

#[derive(Template)]
#[template(path = "home.html")]
struct HomePage {
    title: String,
    visitor: String,
    rendered_at: String,
    items: Vec<Item>,
}

/// GET / — server-rendered catalog page. Askama escapes every interpolation,
/// so hostile item names render inert.
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let page = HomePage {
        title: "Pricebook".to_owned(),
        visitor: "guest".to_owned(),
        rendered_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        items: state.items.list().await?,
    };
    let html = page
        .render()
        .map_err(|e| ApiError::Internal(format!("template render failed: {e}")))?;
    Ok(Html(html))
}
