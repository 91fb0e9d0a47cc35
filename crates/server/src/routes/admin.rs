use axum::{extract::State, routing::post, Json, Router};

use crate::{error::Result, middleware::auth::AuthUser, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reset", post(reset_store))
        .route("/clear", post(clear_store))
}

/// Rewrites every collection with the seed dataset.
async fn reset_store(State(state): State<AppState>, user: AuthUser) -> Result<Json<()>> {
    user.require_admin()?;
    state.repo.store().initialize().await?;
    tracing::warn!(user_id = %user.id, "store reset to seed data");
    Ok(Json(()))
}

/// Drops every collection; reads fall back to seed data until written again.
async fn clear_store(State(state): State<AppState>, user: AuthUser) -> Result<Json<()>> {
    user.require_admin()?;
    state.repo.store().clear().await?;
    tracing::warn!(user_id = %user.id, "store cleared");
    Ok(Json(()))
}
