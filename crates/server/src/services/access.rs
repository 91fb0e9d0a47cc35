//! Role-based visibility rules.
//!
//! | role                       | projects                        | tickets                           |
//! |----------------------------|---------------------------------|-----------------------------------|
//! | admin                      | all                             | all                               |
//! | web developer              | `webDeveloperId == user`        | `assignedTo == user`              |
//! | social media coordinator   | `socialMediaCoordinatorId == user` | tickets on visible projects    |
//! | client                     | `clientId == user`              | `createdBy == user`               |
//!
//! Everything here is a pure function over already-loaded collections; the
//! repository loads fresh data and calls into these.

use std::collections::HashSet;

use crate::db::models::{Project, Role, Ticket};

/// The user an operation is performed on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor<'a> {
    pub id: &'a str,
    pub role: Role,
}

impl<'a> Actor<'a> {
    pub fn new(id: &'a str, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Whether `user_id` acting as `role` sees `project`.
pub fn sees_project(project: &Project, user_id: &str, role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::WebDeveloper => project.web_developer_id.as_deref() == Some(user_id),
        Role::SocialMediaCoordinator => {
            project.social_media_coordinator_id.as_deref() == Some(user_id)
        }
        Role::Client => project.client_id == user_id,
    }
}

pub fn scope_projects(projects: &[Project], user_id: &str, role: Role) -> Vec<Project> {
    projects
        .iter()
        .filter(|p| sees_project(p, user_id, role))
        .cloned()
        .collect()
}

pub fn scope_tickets(
    projects: &[Project],
    tickets: &[Ticket],
    user_id: &str,
    role: Role,
) -> Vec<Ticket> {
    match role {
        Role::Admin => tickets.to_vec(),
        Role::WebDeveloper => tickets
            .iter()
            .filter(|t| t.assigned_to.as_deref() == Some(user_id))
            .cloned()
            .collect(),
        Role::Client => tickets
            .iter()
            .filter(|t| t.created_by == user_id)
            .cloned()
            .collect(),
        Role::SocialMediaCoordinator => {
            let visible: HashSet<&str> = projects
                .iter()
                .filter(|p| sees_project(p, user_id, role))
                .map(|p| p.id.as_str())
                .collect();
            tickets
                .iter()
                .filter(|t| visible.contains(t.project_id.as_str()))
                .cloned()
                .collect()
        }
    }
}

/// Admins may access any project id, existing or not.
pub fn can_access_project(projects: &[Project], user_id: &str, role: Role, project_id: &str) -> bool {
    if role == Role::Admin {
        return true;
    }
    projects
        .iter()
        .any(|p| p.id == project_id && sees_project(p, user_id, role))
}

/// Whether a single ticket is in the actor's visible set.
pub fn can_view_ticket(projects: &[Project], actor: Actor<'_>, ticket: &Ticket) -> bool {
    match actor.role {
        Role::SocialMediaCoordinator => {
            can_access_project(projects, actor.id, actor.role, &ticket.project_id)
        }
        _ => can_manage_ticket(actor, ticket),
    }
}

pub fn can_manage_ticket(actor: Actor<'_>, ticket: &Ticket) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::WebDeveloper => ticket.assigned_to.as_deref() == Some(actor.id),
        Role::Client => ticket.created_by == actor.id,
        Role::SocialMediaCoordinator => false,
    }
}

/// Stage changes belong to admins and the project's developer.
pub fn can_change_stage(actor: Actor<'_>, project: &Project) -> bool {
    actor.is_admin() || project.web_developer_id.as_deref() == Some(actor.id)
}

pub fn can_record_website_analytics(actor: Actor<'_>, project: &Project) -> bool {
    actor.is_admin() || project.web_developer_id.as_deref() == Some(actor.id)
}

pub fn can_record_social_analytics(actor: Actor<'_>, project: &Project) -> bool {
    actor.is_admin() || project.social_media_coordinator_id.as_deref() == Some(actor.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seed;

    const ROLES: [Role; 4] = [
        Role::Admin,
        Role::WebDeveloper,
        Role::SocialMediaCoordinator,
        Role::Client,
    ];

    fn foreign_key(project: &Project, role: Role) -> Option<&str> {
        match role {
            Role::Admin => None,
            Role::WebDeveloper => project.web_developer_id.as_deref(),
            Role::SocialMediaCoordinator => project.social_media_coordinator_id.as_deref(),
            Role::Client => Some(project.client_id.as_str()),
        }
    }

    #[test]
    fn admin_sees_everything() {
        let projects = seed::projects();
        let tickets = seed::tickets();
        assert_eq!(scope_projects(&projects, "user-1", Role::Admin), projects);
        assert_eq!(scope_tickets(&projects, &tickets, "user-1", Role::Admin), tickets);
    }

    #[test]
    fn non_admin_projects_match_role_foreign_key() {
        let projects = seed::projects();
        for user in seed::users() {
            for role in ROLES.into_iter().filter(|r| *r != Role::Admin) {
                let scoped = scope_projects(&projects, &user.id, role);
                assert!(scoped
                    .iter()
                    .all(|p| foreign_key(p, role) == Some(user.id.as_str())));

                let expected = projects
                    .iter()
                    .filter(|p| foreign_key(p, role) == Some(user.id.as_str()))
                    .count();
                assert_eq!(scoped.len(), expected);
            }
        }
    }

    #[test]
    fn developer_and_client_project_counts() {
        let projects = seed::projects();
        assert_eq!(scope_projects(&projects, "user-2", Role::WebDeveloper).len(), 11);
        assert_eq!(scope_projects(&projects, "user-3", Role::WebDeveloper).len(), 9);
        assert_eq!(scope_projects(&projects, "user-6", Role::Client).len(), 11);
        assert!(scope_projects(&projects, "user-5", Role::WebDeveloper).is_empty());
    }

    #[test]
    fn developer_sees_assigned_tickets_only() {
        let projects = seed::projects();
        let tickets = seed::tickets();
        let scoped = scope_tickets(&projects, &tickets, "user-3", Role::WebDeveloper);
        let ids: Vec<_> = scoped.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["ticket-3", "ticket-4", "ticket-8"]);
    }

    #[test]
    fn client_sees_created_tickets_only() {
        let projects = seed::projects();
        let tickets = seed::tickets();
        let scoped = scope_tickets(&projects, &tickets, "user-6", Role::Client);
        assert!(scoped.iter().all(|t| t.created_by == "user-6"));
        assert_eq!(scoped.len(), 4);
    }

    #[test]
    fn coordinator_sees_tickets_on_coordinated_projects() {
        let projects = seed::projects();
        let tickets = seed::tickets();
        let scoped = scope_tickets(&projects, &tickets, "user-4", Role::SocialMediaCoordinator);
        // proj-4 has no coordinator, so ticket-7 is hidden
        assert!(scoped.iter().all(|t| t.id != "ticket-7"));
        assert_eq!(scoped.len(), tickets.len() - 1);
    }

    #[test]
    fn access_project_rules() {
        let projects = seed::projects();
        assert!(can_access_project(&projects, "user-1", Role::Admin, "no-such-project"));
        assert!(can_access_project(&projects, "user-2", Role::WebDeveloper, "proj-1"));
        assert!(!can_access_project(&projects, "user-2", Role::WebDeveloper, "proj-3"));
        assert!(!can_access_project(&projects, "user-5", Role::Client, "no-such-project"));
    }

    #[test]
    fn manage_ticket_requires_admin_assignee_or_creator() {
        let tickets = seed::tickets();
        let users = seed::users();
        for ticket in &tickets {
            for user in &users {
                for role in ROLES {
                    let actor = Actor::new(&user.id, role);
                    let allowed = match role {
                        Role::Admin => true,
                        Role::WebDeveloper => ticket.assigned_to.as_deref() == Some(user.id.as_str()),
                        Role::Client => ticket.created_by == user.id,
                        Role::SocialMediaCoordinator => false,
                    };
                    assert_eq!(can_manage_ticket(actor, ticket), allowed);
                }
            }
        }
    }

    #[test]
    fn creator_acting_as_developer_cannot_manage_unassigned_ticket() {
        let tickets = seed::tickets();
        let unassigned = tickets.iter().find(|t| t.id == "ticket-7").unwrap();
        assert!(!can_manage_ticket(Actor::new("user-6", Role::WebDeveloper), unassigned));
        assert!(can_manage_ticket(Actor::new("user-6", Role::Client), unassigned));
    }

    #[test]
    fn analytics_and_stage_permissions() {
        let projects = seed::projects();
        let proj1 = projects.iter().find(|p| p.id == "proj-1").unwrap();
        assert!(can_change_stage(Actor::new("user-2", Role::WebDeveloper), proj1));
        assert!(!can_change_stage(Actor::new("user-4", Role::SocialMediaCoordinator), proj1));
        assert!(can_record_social_analytics(Actor::new("user-4", Role::SocialMediaCoordinator), proj1));
        assert!(!can_record_website_analytics(Actor::new("user-5", Role::Client), proj1));
    }
}
