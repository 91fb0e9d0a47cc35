use axum::{extract::State, routing::{get, post}, Json, Router};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::{
    db::models::{Role, SessionUser},
    error::{AppError, Result},
    middleware::auth::AuthUser,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/session", get(session))
        .route("/switch-role", post(switch_role))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SwitchRoleRequest {
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub name: String,
    pub role: Role,
    pub exp: usize,
}

pub fn create_token(user: &SessionUser, secret: &str) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(chrono::Duration::days(7))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        name: user.full_name.clone(),
        role: user.role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AppError::Internal("Failed to create token".to_string()))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::Validation("Please fill in all fields".to_string()));
    }

    let user = state
        .repo
        .authenticate(&body.email, &body.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let profile = SessionUser::from(&user);
    state.repo.store().set_session(&profile).await?;

    let token = create_token(&profile, &state.config.jwt_secret)?;
    tracing::info!(user_id = %profile.id, role = ?profile.role, "signed in");

    Ok(Json(AuthResponse {
        token,
        user: profile,
    }))
}

async fn logout(State(state): State<AppState>, user: AuthUser) -> Result<Json<()>> {
    state.repo.store().clear_session().await?;
    tracing::info!(user_id = %user.id, "signed out");
    Ok(Json(()))
}

async fn session(State(state): State<AppState>, user: AuthUser) -> Result<Json<SessionUser>> {
    // The stored session reflects the last sign-in on this store. When it
    // belongs to someone else, rebuild the profile from the user record with
    // the token's role.
    let stored = state
        .repo
        .store()
        .session()
        .await?
        .filter(|s| s.id == user.id);

    let profile = match stored {
        Some(profile) => profile,
        None => {
            let record = state
                .repo
                .user_by_id(&user.id)
                .await?
                .ok_or(AppError::Unauthorized)?;
            SessionUser {
                role: user.role,
                ..SessionUser::from(&record)
            }
        }
    };

    Ok(Json(profile))
}

/// Re-issues the caller's token with another role. Development aid for
/// previewing each role's view of the data.
async fn switch_role(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<SwitchRoleRequest>,
) -> Result<Json<AuthResponse>> {
    if !state.config.allow_role_switch {
        return Err(AppError::Forbidden("Role switching is disabled".to_string()));
    }

    let record = state
        .repo
        .user_by_id(&user.id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let profile = SessionUser {
        role: body.role,
        ..SessionUser::from(&record)
    };
    state.repo.store().set_session(&profile).await?;

    let token = create_token(&profile, &state.config.jwt_secret)?;
    tracing::info!(user_id = %profile.id, from = ?user.role, to = ?profile.role, "role switched");

    Ok(Json(AuthResponse {
        token,
        user: profile,
    }))
}
