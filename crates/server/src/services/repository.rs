// Repository: every data-access, finder and mutation goes through here.
//
// Collections are reloaded from the store on every call and written back
// whole. Writes within this process are serialized by `write_lock`; across
// processes the last writer wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    db::models::{
        Activity, Comment, NewSocialMediaAnalytics, NewTicket, NewUser, NewWebsiteAnalytics,
        Project, ProjectInput, ProjectStageHistory, ProjectStatus, Role, SocialMediaAnalytics,
        Stage, StageStatus, Ticket, TicketStatus, TicketUpdate, User, UserFilter, UserUpdate,
        WebsiteAnalytics,
    },
    error::{AppError, Result},
};

use super::{
    access::{self, Actor},
    seed,
    store::{Collection, Store, WriteBatch},
};

#[derive(Clone)]
pub struct Repository {
    store: Store,
    write_lock: Arc<Mutex<()>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalytics {
    pub website: Vec<WebsiteAnalytics>,
    pub social: Vec<SocialMediaAnalytics>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCounts {
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub closed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub role: Role,
    pub project_count: usize,
    pub projects_by_stage: BTreeMap<Stage, usize>,
    pub tickets: TicketCounts,
    pub recent_activity: Vec<Activity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_count: Option<usize>,
}

/// Head counts over every user, whatever the list filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: usize,
    pub admins: usize,
    pub developers: usize,
    pub coordinators: usize,
    pub clients: usize,
    pub active: usize,
}

#[derive(Debug, Clone)]
pub struct UserDirectory {
    pub users: Vec<User>,
    pub stats: UserStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWorkStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub created_tickets: usize,
    pub assigned_tickets: usize,
}

/// A user with the projects they take part in and the tickets they opened
/// or hold.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub projects: Vec<Project>,
    pub tickets: Vec<Ticket>,
    pub stats: UserWorkStats,
}

const RECENT_ACTIVITY_LIMIT: usize = 10;

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// A timestamp strictly after `previous`, normally just "now".
fn refreshed(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Repository {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // Collections

    pub async fn users(&self) -> Result<Vec<User>> {
        self.store.load(Collection::Users, seed::users).await
    }

    pub async fn projects(&self) -> Result<Vec<Project>> {
        self.store.load(Collection::Projects, seed::projects).await
    }

    pub async fn tickets(&self) -> Result<Vec<Ticket>> {
        self.store.load(Collection::Tickets, seed::tickets).await
    }

    pub async fn comments(&self) -> Result<Vec<Comment>> {
        self.store.load(Collection::Comments, seed::comments).await
    }

    pub async fn website_analytics(&self) -> Result<Vec<WebsiteAnalytics>> {
        self.store
            .load(Collection::WebsiteAnalytics, seed::website_analytics)
            .await
    }

    pub async fn social_analytics(&self) -> Result<Vec<SocialMediaAnalytics>> {
        self.store
            .load(Collection::SocialAnalytics, seed::social_analytics)
            .await
    }

    pub async fn stage_history(&self) -> Result<Vec<ProjectStageHistory>> {
        self.store
            .load(Collection::StageHistory, seed::stage_history)
            .await
    }

    pub async fn activities(&self) -> Result<Vec<Activity>> {
        self.store
            .load(Collection::Activities, seed::activities)
            .await
    }

    // Finders

    pub async fn user_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users().await?.into_iter().find(|u| u.id == id))
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users().await?.into_iter().find(|u| u.email == email))
    }

    pub async fn project_by_id(&self, id: &str) -> Result<Option<Project>> {
        Ok(self.projects().await?.into_iter().find(|p| p.id == id))
    }

    pub async fn ticket_by_id(&self, id: &str) -> Result<Option<Ticket>> {
        Ok(self.tickets().await?.into_iter().find(|t| t.id == id))
    }

    pub async fn tickets_by_project(&self, project_id: &str) -> Result<Vec<Ticket>> {
        let mut tickets = self.tickets().await?;
        tickets.retain(|t| t.project_id == project_id);
        Ok(tickets)
    }

    pub async fn comments_by_ticket(&self, ticket_id: &str) -> Result<Vec<Comment>> {
        let mut comments = self.comments().await?;
        comments.retain(|c| c.ticket_id == ticket_id);
        Ok(comments)
    }

    pub async fn analytics_by_project(&self, project_id: &str) -> Result<ProjectAnalytics> {
        let mut website = self.website_analytics().await?;
        website.retain(|a| a.project_id == project_id);
        let mut social = self.social_analytics().await?;
        social.retain(|a| a.project_id == project_id);
        Ok(ProjectAnalytics { website, social })
    }

    pub async fn stage_history_by_project(&self, project_id: &str) -> Result<Vec<ProjectStageHistory>> {
        let mut history = self.stage_history().await?;
        history.retain(|s| s.project_id == project_id);
        Ok(history)
    }

    pub async fn activities_by_project(&self, project_id: &str) -> Result<Vec<Activity>> {
        let mut activities = self.activities().await?;
        activities.retain(|a| a.project_id == project_id);
        Ok(activities)
    }

    // Scoped views

    pub async fn projects_for(&self, user_id: &str, role: Role) -> Result<Vec<Project>> {
        let projects = self.projects().await?;
        Ok(access::scope_projects(&projects, user_id, role))
    }

    pub async fn tickets_for(&self, user_id: &str, role: Role) -> Result<Vec<Ticket>> {
        let projects = self.projects().await?;
        let tickets = self.tickets().await?;
        Ok(access::scope_tickets(&projects, &tickets, user_id, role))
    }

    /// Tickets on one project, limited to those the actor may see.
    pub async fn project_tickets_for(&self, actor: Actor<'_>, project_id: &str) -> Result<Vec<Ticket>> {
        let projects = self.projects().await?;
        let mut tickets = self.tickets_by_project(project_id).await?;
        tickets.retain(|t| access::can_view_ticket(&projects, actor, t));
        Ok(tickets)
    }

    pub async fn can_access_project(&self, user_id: &str, role: Role, project_id: &str) -> Result<bool> {
        let projects = self.projects().await?;
        Ok(access::can_access_project(&projects, user_id, role, project_id))
    }

    /// The project, if it exists and the actor may see it.
    pub async fn visible_project(&self, actor: Actor<'_>, project_id: &str) -> Result<Option<Project>> {
        if !self.can_access_project(actor.id, actor.role, project_id).await? {
            return Ok(None);
        }
        self.project_by_id(project_id).await
    }

    /// The ticket, if it exists and the actor may see it.
    pub async fn visible_ticket(&self, actor: Actor<'_>, ticket_id: &str) -> Result<Option<Ticket>> {
        let Some(ticket) = self.ticket_by_id(ticket_id).await? else {
            return Ok(None);
        };
        let projects = self.projects().await?;
        Ok(access::can_view_ticket(&projects, actor, &ticket).then_some(ticket))
    }

    // Sign-in

    /// Exact email and password match against active users.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = self
            .user_by_email(email)
            .await?
            .filter(|u| u.password == password);

        match user {
            Some(u) if !u.is_active => {
                tracing::info!(user_id = %u.id, "sign-in refused for inactive user");
                Ok(None)
            }
            other => Ok(other),
        }
    }

    // User management

    pub async fn user_directory(&self, filter: &UserFilter) -> Result<UserDirectory> {
        let users = self.users().await?;

        let mut stats = UserStats {
            total: users.len(),
            ..Default::default()
        };
        for user in &users {
            match user.role {
                Role::Admin => stats.admins += 1,
                Role::WebDeveloper => stats.developers += 1,
                Role::SocialMediaCoordinator => stats.coordinators += 1,
                Role::Client => stats.clients += 1,
            }
            if user.is_active {
                stats.active += 1;
            }
        }

        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let users = users
            .into_iter()
            .filter(|u| {
                needle.as_deref().map_or(true, |n| {
                    u.full_name.to_lowercase().contains(n) || u.email.to_lowercase().contains(n)
                })
            })
            .filter(|u| filter.role.map_or(true, |role| u.role == role))
            .filter(|u| filter.active.map_or(true, |active| u.is_active == active))
            .collect();

        Ok(UserDirectory { users, stats })
    }

    pub async fn user_profile(&self, id: &str) -> Result<Option<UserProfile>> {
        let Some(user) = self.user_by_id(id).await? else {
            return Ok(None);
        };

        let projects: Vec<Project> = self
            .projects()
            .await?
            .into_iter()
            .filter(|p| {
                p.client_id == id
                    || p.web_developer_id.as_deref() == Some(id)
                    || p.social_media_coordinator_id.as_deref() == Some(id)
            })
            .collect();
        let tickets: Vec<Ticket> = self
            .tickets()
            .await?
            .into_iter()
            .filter(|t| t.created_by == id || t.assigned_to.as_deref() == Some(id))
            .collect();

        let stats = UserWorkStats {
            total_projects: projects.len(),
            active_projects: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Active)
                .count(),
            created_tickets: tickets.iter().filter(|t| t.created_by == id).count(),
            assigned_tickets: tickets
                .iter()
                .filter(|t| t.assigned_to.as_deref() == Some(id))
                .count(),
        };

        Ok(Some(UserProfile {
            user,
            projects,
            tickets,
            stats,
        }))
    }

    pub async fn create_user(&self, input: NewUser) -> Result<User> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.users().await?;

        if users.iter().any(|u| u.email == input.email) {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: new_id("user"),
            email: input.email,
            password: input.password,
            full_name: input.full_name,
            phone: input.phone,
            role: input.role,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        };

        users.push(user.clone());
        self.store.save(Collection::Users, &users).await?;

        tracing::info!(user_id = %user.id, role = ?user.role, "user created");
        Ok(user)
    }

    pub async fn update_user(&self, id: &str, update: UserUpdate) -> Result<Option<User>> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.users().await?;

        let Some(index) = users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(email) = &update.email {
            if *email != users[index].email && users.iter().any(|u| u.id != id && u.email == *email) {
                return Err(AppError::Conflict(
                    "Email already in use by another user".to_string(),
                ));
            }
        }

        let user = &mut users[index];
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(password) = update.password {
            user.password = password;
        }
        if let Some(full_name) = update.full_name {
            user.full_name = full_name;
        }
        if let Some(phone) = update.phone {
            user.phone = phone;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        user.updated_at = refreshed(user.updated_at);

        let updated = user.clone();
        self.store.save(Collection::Users, &users).await?;

        tracing::info!(user_id = %updated.id, "user updated");
        Ok(Some(updated))
    }

    pub async fn delete_user(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let users = self.users().await?;
        let before = users.len();

        let remaining: Vec<User> = users.into_iter().filter(|u| u.id != id).collect();
        if remaining.len() == before {
            return Ok(false);
        }

        self.store.save(Collection::Users, &remaining).await?;
        tracing::info!(user_id = %id, "user deleted");
        Ok(true)
    }

    // Project management

    pub async fn create_project(&self, input: ProjectInput) -> Result<Project> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.projects().await?;

        let now = Utc::now();
        let project = Project {
            id: new_id("proj"),
            name: input.name,
            description: input.description,
            project_type: input.project_type,
            client_id: input.client_id,
            web_developer_id: input.web_developer_id,
            social_media_coordinator_id: input.social_media_coordinator_id,
            current_stage: input.current_stage,
            status: input.status,
            website_url: input.website_url,
            google_analytics_property_id: input.google_analytics_property_id,
            google_analytics_view_id: input.google_analytics_view_id,
            social_media_platforms: input.social_media_platforms,
            campaign_goals: input.campaign_goals,
            target_audience: input.target_audience,
            notes: input.notes,
            created_at: now,
            updated_at: now,
            launch_date: input.launch_date,
        };

        projects.push(project.clone());
        self.store.save(Collection::Projects, &projects).await?;

        tracing::info!(project_id = %project.id, "project created");
        Ok(project)
    }

    /// Overwrites every mutable field; `id` and `createdAt` are kept.
    pub async fn update_project(&self, id: &str, input: ProjectInput) -> Result<Option<Project>> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.projects().await?;

        let Some(project) = projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        *project = Project {
            id: project.id.clone(),
            name: input.name,
            description: input.description,
            project_type: input.project_type,
            client_id: input.client_id,
            web_developer_id: input.web_developer_id,
            social_media_coordinator_id: input.social_media_coordinator_id,
            current_stage: input.current_stage,
            status: input.status,
            website_url: input.website_url,
            google_analytics_property_id: input.google_analytics_property_id,
            google_analytics_view_id: input.google_analytics_view_id,
            social_media_platforms: input.social_media_platforms,
            campaign_goals: input.campaign_goals,
            target_audience: input.target_audience,
            notes: input.notes,
            created_at: project.created_at,
            updated_at: refreshed(project.updated_at),
            launch_date: input.launch_date,
        };

        let updated = project.clone();
        self.store.save(Collection::Projects, &projects).await?;

        tracing::info!(project_id = %updated.id, "project updated");
        Ok(Some(updated))
    }

    pub async fn delete_project(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let projects = self.projects().await?;
        let before = projects.len();

        let remaining: Vec<Project> = projects.into_iter().filter(|p| p.id != id).collect();
        if remaining.len() == before {
            return Ok(false);
        }

        self.store.save(Collection::Projects, &remaining).await?;
        tracing::info!(project_id = %id, "project deleted");
        Ok(true)
    }

    // Tickets

    /// New tickets go to the project's developer. Only admins may name
    /// someone else.
    pub async fn create_ticket(&self, actor: Actor<'_>, input: NewTicket) -> Result<Ticket> {
        let _guard = self.write_lock.lock().await;
        let projects = self.projects().await?;

        let project = projects
            .iter()
            .find(|p| p.id == input.project_id)
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

        if !access::can_access_project(&projects, actor.id, actor.role, &project.id) {
            return Err(AppError::Forbidden(
                "Cannot create tickets on this project".to_string(),
            ));
        }

        let assigned_to = match input.assigned_to {
            Some(assignee)
                if !actor.is_admin()
                    && project.web_developer_id.as_deref() != Some(assignee.as_str()) =>
            {
                return Err(AppError::Forbidden(
                    "Only administrators can assign tickets".to_string(),
                ));
            }
            Some(assignee) => Some(assignee),
            None => project.web_developer_id.clone(),
        };

        let now = Utc::now();
        let ticket = Ticket {
            id: new_id("ticket"),
            project_id: project.id.clone(),
            created_by: actor.id.to_string(),
            assigned_to,
            title: input.title,
            description: input.description,
            ticket_type: input.ticket_type,
            priority: input.priority,
            status: TicketStatus::Open,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        };

        let mut tickets = self.tickets().await?;
        tickets.push(ticket.clone());

        let mut batch = self.store.batch();
        batch.put(Collection::Tickets, &tickets)?;
        self.log_activity(
            &mut batch,
            actor.id,
            &ticket.project_id,
            "ticket_created",
            format!("Created new ticket '{}'", ticket.title),
        )
        .await?;
        batch.commit().await?;

        tracing::info!(ticket_id = %ticket.id, project_id = %ticket.project_id, "ticket created");
        Ok(ticket)
    }

    pub async fn update_ticket(
        &self,
        actor: Actor<'_>,
        id: &str,
        update: TicketUpdate,
    ) -> Result<Option<Ticket>> {
        let _guard = self.write_lock.lock().await;
        let mut tickets = self.tickets().await?;

        let Some(ticket) = tickets.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if !access::can_manage_ticket(actor, ticket) {
            return Err(AppError::Forbidden("Cannot modify this ticket".to_string()));
        }

        if update.assigned_to.is_some()
            && update.assigned_to != ticket.assigned_to
            && !actor.is_admin()
        {
            return Err(AppError::Forbidden(
                "Only administrators can reassign tickets".to_string(),
            ));
        }

        let previous_status = ticket.status;
        let previous_type = ticket.ticket_type;
        if let Some(title) = update.title {
            ticket.title = title;
        }
        if let Some(description) = update.description {
            ticket.description = description;
        }
        if let Some(ticket_type) = update.ticket_type {
            ticket.ticket_type = ticket_type;
        }
        if let Some(priority) = update.priority {
            ticket.priority = priority;
        }
        if let Some(assigned_to) = update.assigned_to {
            ticket.assigned_to = Some(assigned_to);
        }
        if let Some(status) = update.status {
            ticket.status = status;
        }

        ticket.updated_at = refreshed(ticket.updated_at);
        if !ticket.status.is_done() {
            ticket.resolved_at = None;
        } else if ticket.resolved_at.is_none() {
            ticket.resolved_at = Some(ticket.updated_at);
        }

        let updated = ticket.clone();

        let description = if updated.status != previous_status {
            format!(
                "Updated ticket status to {} for '{}'",
                updated.status.display_name(),
                updated.title
            )
        } else if updated.ticket_type != previous_type {
            format!(
                "Changed ticket type to {} for '{}'",
                updated.ticket_type.display_name(),
                updated.title
            )
        } else {
            format!("Updated ticket '{}'", updated.title)
        };

        let mut batch = self.store.batch();
        batch.put(Collection::Tickets, &tickets)?;
        self.log_activity(&mut batch, actor.id, &updated.project_id, "ticket_updated", description)
            .await?;
        batch.commit().await?;

        tracing::info!(ticket_id = %updated.id, status = ?updated.status, "ticket updated");
        Ok(Some(updated))
    }

    pub async fn delete_ticket(&self, actor: Actor<'_>, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let tickets = self.tickets().await?;

        let Some(ticket) = tickets.iter().find(|t| t.id == id) else {
            return Ok(false);
        };

        if !access::can_manage_ticket(actor, ticket) {
            return Err(AppError::Forbidden("Cannot delete this ticket".to_string()));
        }

        let remaining: Vec<Ticket> = tickets.iter().filter(|t| t.id != id).cloned().collect();
        self.store.save(Collection::Tickets, &remaining).await?;

        tracing::info!(ticket_id = %id, "ticket deleted");
        Ok(true)
    }

    // Comments

    pub async fn add_comment(&self, actor: Actor<'_>, ticket_id: &str, content: String) -> Result<Comment> {
        let _guard = self.write_lock.lock().await;

        if self.visible_ticket(actor, ticket_id).await?.is_none() {
            return Err(AppError::NotFound("Ticket not found".to_string()));
        }

        let now = Utc::now();
        let comment = Comment {
            id: new_id("comment"),
            ticket_id: ticket_id.to_string(),
            user_id: actor.id.to_string(),
            content,
            created_at: now,
            updated_at: now,
            is_edited: false,
        };

        let mut comments = self.comments().await?;
        comments.push(comment.clone());
        self.store.save(Collection::Comments, &comments).await?;

        Ok(comment)
    }

    // Stages

    pub async fn advance_stage(&self, actor: Actor<'_>, project_id: &str, stage: Stage) -> Result<Project> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.projects().await?;

        let project = projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

        if !access::can_change_stage(actor, project) {
            return Err(AppError::Forbidden(
                "Cannot change the stage of this project".to_string(),
            ));
        }
        if project.current_stage == stage {
            return Err(AppError::Validation(format!(
                "Project is already in the {} stage",
                stage.display_name()
            )));
        }

        let now = refreshed(project.updated_at);
        project.current_stage = stage;
        project.updated_at = now;
        if stage == Stage::Launch && project.launch_date.is_none() {
            project.launch_date = Some(now);
        }
        let updated = project.clone();

        let mut history = self.stage_history().await?;
        for entry in history
            .iter_mut()
            .filter(|h| h.project_id == project_id && h.status == StageStatus::InProgress)
        {
            entry.status = StageStatus::Completed;
            entry.end_date = Some(now);
            entry.completed_by = Some(actor.id.to_string());
        }
        history.push(ProjectStageHistory {
            id: new_id("stage"),
            project_id: project_id.to_string(),
            stage,
            start_date: now,
            end_date: None,
            status: StageStatus::InProgress,
            completed_by: None,
        });

        let mut batch = self.store.batch();
        batch.put(Collection::Projects, &projects)?;
        batch.put(Collection::StageHistory, &history)?;
        self.log_activity(
            &mut batch,
            actor.id,
            project_id,
            "stage_updated",
            format!("Moved project to {} stage", stage.display_name()),
        )
        .await?;
        batch.commit().await?;

        tracing::info!(project_id, stage = ?stage, "project stage changed");
        Ok(updated)
    }

    // Analytics

    pub async fn record_website_analytics(
        &self,
        actor: Actor<'_>,
        project_id: &str,
        input: NewWebsiteAnalytics,
    ) -> Result<WebsiteAnalytics> {
        let _guard = self.write_lock.lock().await;
        let project = self.analytics_target(project_id).await?;
        if !access::can_record_website_analytics(actor, &project) {
            return Err(AppError::Forbidden(
                "Cannot record website analytics for this project".to_string(),
            ));
        }

        let record = WebsiteAnalytics {
            id: new_id("analytics"),
            project_id: project.id,
            date: input.date,
            page_views: input.page_views,
            unique_visitors: input.unique_visitors,
            bounce_rate: input.bounce_rate,
            recorded_by: actor.id.to_string(),
            created_at: Utc::now(),
        };

        let mut all = self.website_analytics().await?;
        all.push(record.clone());

        let mut batch = self.store.batch();
        batch.put(Collection::WebsiteAnalytics, &all)?;
        self.log_activity(
            &mut batch,
            actor.id,
            project_id,
            "analytics_added",
            format!("Added website analytics for {}", record.date.format("%Y-%m-%d")),
        )
        .await?;
        batch.commit().await?;

        Ok(record)
    }

    pub async fn record_social_analytics(
        &self,
        actor: Actor<'_>,
        project_id: &str,
        input: NewSocialMediaAnalytics,
    ) -> Result<SocialMediaAnalytics> {
        let _guard = self.write_lock.lock().await;
        let project = self.analytics_target(project_id).await?;
        if !access::can_record_social_analytics(actor, &project) {
            return Err(AppError::Forbidden(
                "Cannot record social media analytics for this project".to_string(),
            ));
        }

        let record = SocialMediaAnalytics {
            id: new_id("social"),
            project_id: project.id,
            platform: input.platform,
            date: input.date,
            posts: input.posts,
            engagement: input.engagement,
            reach: input.reach,
            followers: input.followers,
            likes: input.likes,
            comments: input.comments,
            shares: input.shares,
            recorded_by: actor.id.to_string(),
            created_at: Utc::now(),
        };

        let mut all = self.social_analytics().await?;
        all.push(record.clone());

        let mut batch = self.store.batch();
        batch.put(Collection::SocialAnalytics, &all)?;
        self.log_activity(
            &mut batch,
            actor.id,
            project_id,
            "analytics_added",
            format!("Added social media analytics for {}", capitalize(&record.platform)),
        )
        .await?;
        batch.commit().await?;

        Ok(record)
    }

    async fn analytics_target(&self, project_id: &str) -> Result<Project> {
        self.project_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
    }

    // Dashboard

    pub async fn dashboard_for(&self, actor: Actor<'_>) -> Result<Dashboard> {
        let all_projects = self.projects().await?;
        let projects = access::scope_projects(&all_projects, actor.id, actor.role);
        let tickets = access::scope_tickets(&all_projects, &self.tickets().await?, actor.id, actor.role);

        let mut projects_by_stage = BTreeMap::new();
        for project in &projects {
            *projects_by_stage.entry(project.current_stage).or_insert(0) += 1;
        }

        let mut counts = TicketCounts::default();
        for ticket in &tickets {
            match ticket.status {
                TicketStatus::Open => counts.open += 1,
                TicketStatus::InProgress => counts.in_progress += 1,
                TicketStatus::Resolved => counts.resolved += 1,
                TicketStatus::Closed => counts.closed += 1,
            }
        }

        let mut recent_activity: Vec<Activity> = self
            .activities()
            .await?
            .into_iter()
            .filter(|a| projects.iter().any(|p| p.id == a.project_id))
            .collect();
        recent_activity.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_activity.truncate(RECENT_ACTIVITY_LIMIT);

        let user_count = if actor.is_admin() {
            Some(self.users().await?.len())
        } else {
            None
        };

        Ok(Dashboard {
            role: actor.role,
            project_count: projects.len(),
            projects_by_stage,
            tickets: counts,
            recent_activity,
            user_count,
        })
    }

    /// Stages an activity entry alongside the write it describes. Callers
    /// hold `write_lock`.
    async fn log_activity(
        &self,
        batch: &mut WriteBatch<'_>,
        user_id: &str,
        project_id: &str,
        action: &str,
        description: String,
    ) -> Result<()> {
        let mut activities = self.activities().await?;
        activities.push(Activity {
            id: new_id("activity"),
            user_id: user_id.to_string(),
            project_id: project_id.to_string(),
            action: action.to_string(),
            description,
            created_at: Utc::now(),
        });
        batch.put(Collection::Activities, &activities)
    }
}
