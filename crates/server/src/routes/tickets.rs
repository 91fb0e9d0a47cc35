use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::models::{Comment, NewTicket, Ticket, TicketStatus, TicketUpdate},
    error::{AppError, Result},
    middleware::auth::AuthUser,
    AppState,
};

use super::validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tickets).post(create_ticket))
        .route(
            "/:id",
            get(get_ticket).put(update_ticket).delete(delete_ticket),
        )
        .route("/:id/comments", get(list_comments).post(create_comment))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    pub project_id: Option<String>,
    pub status: Option<TicketStatus>,
}

#[derive(Debug, Serialize)]
pub struct TicketListResponse {
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CommentsListResponse {
    pub comments: Vec<Comment>,
}

async fn list_tickets(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<TicketFilter>,
) -> Result<Json<TicketListResponse>> {
    let mut tickets = state.repo.tickets_for(&user.id, user.role).await?;

    if let Some(project_id) = &filter.project_id {
        tickets.retain(|t| &t.project_id == project_id);
    }
    if let Some(status) = filter.status {
        tickets.retain(|t| t.status == status);
    }
    tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    Ok(Json(TicketListResponse { tickets }))
}

async fn create_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<NewTicket>,
) -> Result<Json<Ticket>> {
    validate::required(&body.title, "Ticket title is required")?;

    let ticket = state.repo.create_ticket(user.actor(), body).await?;
    Ok(Json(ticket))
}

async fn get_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Ticket>> {
    let ticket = state
        .repo
        .visible_ticket(user.actor(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(ticket))
}

async fn update_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<TicketUpdate>,
) -> Result<Json<Ticket>> {
    if let Some(title) = &body.title {
        validate::required(title, "Ticket title is required")?;
    }

    let ticket = state
        .repo
        .update_ticket(user.actor(), &id, body)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(ticket))
}

async fn delete_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<()>> {
    if !state.repo.delete_ticket(user.actor(), &id).await? {
        return Err(AppError::NotFound("Ticket not found".to_string()));
    }

    Ok(Json(()))
}

async fn list_comments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<CommentsListResponse>> {
    state
        .repo
        .visible_ticket(user.actor(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    let mut comments = state.repo.comments_by_ticket(&id).await?;
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    Ok(Json(CommentsListResponse { comments }))
}

async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<Json<Comment>> {
    validate::required(&body.content, "Comment content is required")?;

    let comment = state
        .repo
        .add_comment(user.actor(), &id, body.content)
        .await?;
    Ok(Json(comment))
}
