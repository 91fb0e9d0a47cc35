use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{
    db::models::{NewUser, Project, Ticket, UserFilter, UserUpdate, UserView},
    error::{AppError, Result},
    middleware::auth::AuthUser,
    services::repository::{UserStats, UserWorkStats},
    AppState,
};

use super::validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserView>,
    pub stats: UserStats,
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: UserView,
    pub projects: Vec<Project>,
    pub tickets: Vec<Ticket>,
    pub stats: UserWorkStats,
}

async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<UserFilter>,
) -> Result<Json<UserListResponse>> {
    user.require_admin()?;

    let directory = state.repo.user_directory(&filter).await?;
    let users = directory.users.into_iter().map(UserView::from).collect();

    Ok(Json(UserListResponse {
        users,
        stats: directory.stats,
    }))
}

async fn get_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserDetailResponse>> {
    user.require_admin()?;

    let profile = state
        .repo
        .user_profile(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserDetailResponse {
        user: profile.user.into(),
        projects: profile.projects,
        tickets: profile.tickets,
        stats: profile.stats,
    }))
}

async fn create_user(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<NewUser>,
) -> Result<Json<UserView>> {
    user.require_admin()?;

    if body.full_name.trim().is_empty() || body.phone.trim().is_empty() {
        return Err(AppError::Validation(
            "Please fill in all required fields".to_string(),
        ));
    }
    validate::email(&body.email)?;
    validate::password(&body.password)?;

    let created = state.repo.create_user(body).await?;
    Ok(Json(created.into()))
}

async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UserUpdate>,
) -> Result<Json<UserView>> {
    user.require_admin()?;

    if let Some(email) = &body.email {
        validate::email(email)?;
    }
    if let Some(password) = &body.password {
        validate::password(password)?;
    }
    if [&body.full_name, &body.phone]
        .into_iter()
        .flatten()
        .any(|v| v.trim().is_empty())
    {
        return Err(AppError::Validation(
            "Please fill in all required fields".to_string(),
        ));
    }

    let updated = state
        .repo
        .update_user(&id, body)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(updated.into()))
}

async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<()>> {
    user.require_admin()?;

    if id == user.id {
        return Err(AppError::Validation(
            "You cannot delete your own account".to_string(),
        ));
    }

    if !state.repo.delete_user(&id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(Json(()))
}
