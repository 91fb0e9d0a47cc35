pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod projects;
pub mod tickets;
pub mod users;
pub mod validate;

use axum::{middleware as axum_middleware, routing::post, Router};

use crate::{middleware, AppState};

pub fn api_router(state: AppState) -> Router<AppState> {
    // Routes that require a bearer token
    let protected_routes = Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/projects", projects::router())
        .nest("/tickets", tickets::router())
        .nest("/dashboard", dashboard::router())
        .nest("/admin", admin::router())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::auth::auth_middleware,
        ));

    Router::new()
        .route("/auth/login", post(auth::login))
        .merge(protected_routes)
}

#[cfg(test)]
mod tests;
