use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::models::{
        Activity, NewSocialMediaAnalytics, NewWebsiteAnalytics, Project, ProjectInput,
        ProjectStageHistory, ProjectType, SocialMediaAnalytics, Stage, Ticket, WebsiteAnalytics,
    },
    error::{AppError, Result},
    middleware::auth::AuthUser,
    services::repository::ProjectAnalytics,
    AppState,
};

use super::validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/:id/tickets", get(list_project_tickets))
        .route("/:id/stages", get(list_stages))
        .route("/:id/stage", post(advance_stage))
        .route("/:id/activities", get(list_activities))
        .route("/:id/analytics", get(get_analytics))
        .route("/:id/analytics/website", post(record_website_analytics))
        .route("/:id/analytics/social", post(record_social_analytics))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub project: Project,
    pub stage_progress: u8,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            stage_progress: project.current_stage.progress(),
            project,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponse>,
}

#[derive(Debug, Serialize)]
pub struct TicketListResponse {
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Serialize)]
pub struct StageListResponse {
    pub stages: Vec<ProjectStageHistory>,
}

#[derive(Debug, Serialize)]
pub struct ActivityListResponse {
    pub activities: Vec<Activity>,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceStageRequest {
    pub stage: Stage,
}

fn validate_project(input: &ProjectInput) -> Result<()> {
    validate::required(&input.name, "Project name is required")?;
    validate::required(&input.client_id, "A client must be selected")?;

    if input.project_type == ProjectType::SocialMedia
        && input
            .social_media_platforms
            .as_ref()
            .map_or(true, |platforms| platforms.is_empty())
    {
        return Err(AppError::Validation(
            "Select at least one social media platform".to_string(),
        ));
    }
    Ok(())
}

/// Loads the project if the caller may see it; hidden and missing projects
/// look the same.
async fn visible_project(state: &AppState, user: &AuthUser, id: &str) -> Result<Project> {
    state
        .repo
        .visible_project(user.actor(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
}

async fn list_projects(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProjectListResponse>> {
    let mut projects = state.repo.projects_for(&user.id, user.role).await?;
    projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    let projects = projects.into_iter().map(ProjectResponse::from).collect();
    Ok(Json(ProjectListResponse { projects }))
}

async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<ProjectInput>,
) -> Result<Json<ProjectResponse>> {
    user.require_admin()?;
    validate_project(&body)?;

    let project = state.repo.create_project(body).await?;
    Ok(Json(project.into()))
}

async fn get_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ProjectResponse>> {
    let project = visible_project(&state, &user, &id).await?;
    Ok(Json(project.into()))
}

async fn update_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<ProjectInput>,
) -> Result<Json<ProjectResponse>> {
    user.require_admin()?;
    validate_project(&body)?;

    let project = state
        .repo
        .update_project(&id, body)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    Ok(Json(project.into()))
}

async fn delete_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<()>> {
    user.require_admin()?;

    if !state.repo.delete_project(&id).await? {
        return Err(AppError::NotFound("Project not found".to_string()));
    }

    Ok(Json(()))
}

async fn list_project_tickets(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TicketListResponse>> {
    visible_project(&state, &user, &id).await?;

    let tickets = state.repo.project_tickets_for(user.actor(), &id).await?;
    Ok(Json(TicketListResponse { tickets }))
}

async fn list_stages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StageListResponse>> {
    visible_project(&state, &user, &id).await?;

    let stages = state.repo.stage_history_by_project(&id).await?;
    Ok(Json(StageListResponse { stages }))
}

async fn advance_stage(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<AdvanceStageRequest>,
) -> Result<Json<ProjectResponse>> {
    visible_project(&state, &user, &id).await?;

    let project = state
        .repo
        .advance_stage(user.actor(), &id, body.stage)
        .await?;
    Ok(Json(project.into()))
}

async fn list_activities(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ActivityListResponse>> {
    visible_project(&state, &user, &id).await?;

    let mut activities = state.repo.activities_by_project(&id).await?;
    activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(ActivityListResponse { activities }))
}

async fn get_analytics(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ProjectAnalytics>> {
    visible_project(&state, &user, &id).await?;

    Ok(Json(state.repo.analytics_by_project(&id).await?))
}

async fn record_website_analytics(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<NewWebsiteAnalytics>,
) -> Result<Json<WebsiteAnalytics>> {
    visible_project(&state, &user, &id).await?;

    if !(0.0..=100.0).contains(&body.bounce_rate) {
        return Err(AppError::Validation(
            "Bounce rate must be between 0 and 100".to_string(),
        ));
    }

    let record = state
        .repo
        .record_website_analytics(user.actor(), &id, body)
        .await?;
    Ok(Json(record))
}

async fn record_social_analytics(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<NewSocialMediaAnalytics>,
) -> Result<Json<SocialMediaAnalytics>> {
    visible_project(&state, &user, &id).await?;
    validate::required(&body.platform, "Platform is required")?;

    let record = state
        .repo
        .record_social_analytics(user.actor(), &id, body)
        .await?;
    Ok(Json(record))
}
