//! Stored record shapes. Every collection is persisted as a JSON array of
//! one of these types, so field names and enum spellings are part of the
//! storage format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    WebDeveloper,
    SocialMediaCoordinator,
    Client,
}

impl Role {
    pub fn display_name(self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::WebDeveloper => "Web Developer",
            Role::SocialMediaCoordinator => "Social Media Coordinator",
            Role::Client => "Client",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Website,
    SocialMedia,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Planning,
    Design,
    Development,
    Testing,
    Launch,
    Maintenance,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Planning,
        Stage::Design,
        Stage::Development,
        Stage::Testing,
        Stage::Launch,
        Stage::Maintenance,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Completion percentage shown on client dashboards.
    pub fn progress(self) -> u8 {
        ((self.index() + 1) * 100 / Self::ALL.len()) as u8
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Stage::Planning => "Planning",
            Stage::Design => "Design",
            Stage::Development => "Development",
            Stage::Testing => "Testing",
            Stage::Launch => "Launch",
            Stage::Maintenance => "Maintenance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    BugReport,
    FeatureRequest,
    ContentChange,
    DesignUpdate,
}

impl TicketType {
    pub fn display_name(self) -> &'static str {
        match self {
            TicketType::BugReport => "Bug Report",
            TicketType::FeatureRequest => "Feature Request",
            TicketType::ContentChange => "Content Change",
            TicketType::DesignUpdate => "Design Update",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn is_done(self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as returned to callers, without the password.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub role: Role,
    pub role_name: &'static str,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            phone: user.phone,
            role: user.role,
            role_name: user.role.display_name(),
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Public profile of the signed-in user, persisted under the session key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub phone: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            phone: user.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub project_type: ProjectType,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_developer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media_coordinator_id: Option<String>,
    pub current_stage: Stage,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_analytics_property_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_analytics_view_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media_platforms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_goals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub project_id: String,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub priority: Priority,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub ticket_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_edited: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteAnalytics {
    pub id: String,
    pub project_id: String,
    pub date: DateTime<Utc>,
    pub page_views: u64,
    pub unique_visitors: u64,
    pub bounce_rate: f64,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMediaAnalytics {
    pub id: String,
    pub project_id: String,
    pub platform: String,
    pub date: DateTime<Utc>,
    pub posts: u64,
    pub engagement: u64,
    pub reach: u64,
    pub followers: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<u64>,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStageHistory {
    pub id: String,
    pub project_id: String,
    pub stage: Stage,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub status: StageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    pub action: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

// Inputs accepted by the repository

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Narrows the user list; every set field must match.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    /// Case-insensitive match against name or email.
    pub search: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// Every mutable project field. Updates overwrite the stored record with
/// these values wholesale.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub project_type: ProjectType,
    pub client_id: String,
    #[serde(default)]
    pub web_developer_id: Option<String>,
    #[serde(default)]
    pub social_media_coordinator_id: Option<String>,
    #[serde(default = "default_stage")]
    pub current_stage: Stage,
    #[serde(default = "default_project_status")]
    pub status: ProjectStatus,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub google_analytics_property_id: Option<String>,
    #[serde(default)]
    pub google_analytics_view_id: Option<String>,
    #[serde(default)]
    pub social_media_platforms: Option<Vec<String>>,
    #[serde(default)]
    pub campaign_goals: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub launch_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ticket_type: Option<TicketType>,
    pub priority: Option<Priority>,
    pub status: Option<TicketStatus>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWebsiteAnalytics {
    pub date: DateTime<Utc>,
    pub page_views: u64,
    pub unique_visitors: u64,
    pub bounce_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSocialMediaAnalytics {
    pub platform: String,
    pub date: DateTime<Utc>,
    pub posts: u64,
    pub engagement: u64,
    pub reach: u64,
    pub followers: u64,
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default)]
    pub comments: Option<u64>,
    #[serde(default)]
    pub shares: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_stage() -> Stage {
    Stage::Planning
}

fn default_project_status() -> ProjectStatus {
    ProjectStatus::Active
}

fn default_priority() -> Priority {
    Priority::Medium
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_progress_reaches_100_at_maintenance() {
        assert_eq!(Stage::Planning.progress(), 16);
        assert_eq!(Stage::Testing.progress(), 66);
        assert_eq!(Stage::Maintenance.progress(), 100);
    }

    #[test]
    fn ticket_serializes_type_field_and_skips_missing_options() {
        let ticket: Ticket = serde_json::from_value(serde_json::json!({
            "id": "ticket-1",
            "projectId": "proj-1",
            "createdBy": "user-5",
            "title": "Fix nav",
            "description": "",
            "type": "bug_report",
            "priority": "high",
            "status": "in_progress",
            "createdAt": "2025-02-07T00:00:00Z",
            "updatedAt": "2025-02-07T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(ticket.ticket_type, TicketType::BugReport);
        assert_eq!(ticket.status, TicketStatus::InProgress);

        let value = serde_json::to_value(&ticket).unwrap();
        assert_eq!(value["type"], "bug_report");
        assert!(value.get("assignedTo").is_none());
        assert!(value.get("resolvedAt").is_none());
    }

    #[test]
    fn user_view_drops_password() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "user-1",
            "email": "admin@system.com",
            "password": "admin123",
            "fullName": "Admin User",
            "phone": "+27821234567",
            "role": "admin",
            "isActive": true,
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();

        let value = serde_json::to_value(UserView::from(user)).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["role"], "admin");
        assert_eq!(value["roleName"], "Administrator");
    }
}
