use axum::{extract::State, routing::get, Json, Router};

use crate::{error::Result, middleware::auth::AuthUser, services::repository::Dashboard, AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

async fn dashboard(State(state): State<AppState>, user: AuthUser) -> Result<Json<Dashboard>> {
    Ok(Json(state.repo.dashboard_for(user.actor()).await?))
}
