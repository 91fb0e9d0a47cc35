use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use crate::{
    build_app,
    config::Config,
    services::{kv::MemoryKv, repository::Repository, store::Store},
    AppState,
};

async fn app_with(config: Config) -> Router {
    let store = Store::new(Arc::new(MemoryKv::new()), config.storage_namespace.clone());
    store.initialize().await.unwrap();
    build_app(AppState {
        repo: Repository::new(store),
        config,
    })
}

async fn app() -> Router {
    app_with(Config::default()).await
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_requires_token() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = send(&app, Method::GET, "/api/projects", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = app().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@system.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_stores_session_without_password() {
    let app = app().await;
    let token = login(&app, "social@system.com", "social123").await;

    let (status, body) = send(&app, Method::GET, "/api/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "user-4");
    assert_eq!(body["role"], "social_media_coordinator");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn project_list_is_scoped_by_role() {
    let app = app().await;

    let token = login(&app, "dev@system.com", "dev123").await;
    let (_, body) = send(&app, Method::GET, "/api/projects", Some(&token), None).await;
    let projects = body["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 11);
    assert!(projects.iter().all(|p| p["webDeveloperId"] == "user-2"));
    assert!(projects.iter().all(|p| p["stageProgress"].is_number()));

    let token = login(&app, "admin@system.com", "admin123").await;
    let (_, body) = send(&app, Method::GET, "/api/projects", Some(&token), None).await;
    assert_eq!(body["projects"].as_array().unwrap().len(), 25);
}

#[tokio::test]
async fn hidden_project_reads_as_not_found() {
    let app = app().await;
    let token = login(&app, "client2@company.com", "client123").await;

    let (status, _) = send(&app, Method::GET, "/api/projects/proj-1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/api/projects/proj-3", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Megrolowveld");
}

#[tokio::test]
async fn user_management_is_admin_only() {
    let app = app().await;
    let client = login(&app, "client@system.com", "client123").await;
    let (status, _) = send(&app, Method::GET, "/api/users", Some(&client), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = login(&app, "admin@system.com", "admin123").await;
    let new_user = json!({
        "email": "new.client@company.com",
        "password": "client123",
        "fullName": "New Client",
        "phone": "+27821111111",
        "role": "client"
    });

    let (status, created) = send(&app, Method::POST, "/api/users", Some(&admin), Some(new_user.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(created.get("password").is_none());
    assert_eq!(created["isActive"], true);

    let (status, body) = send(&app, Method::POST, "/api/users", Some(&admin), Some(new_user)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User with this email already exists");

    let (_, listed) = send(&app, Method::GET, "/api/users", Some(&admin), None).await;
    assert_eq!(listed["users"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn user_form_validation() {
    let app = app().await;
    let admin = login(&app, "admin@system.com", "admin123").await;

    let short_password = json!({
        "email": "x@company.com",
        "password": "123",
        "fullName": "X",
        "phone": "1",
        "role": "client"
    });
    let (status, body) = send(&app, Method::POST, "/api/users", Some(&admin), Some(short_password)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password must be at least 6 characters long");

    let (status, _) = send(&app, Method::DELETE, "/api/users/user-1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, "/api/users/user-404", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_updates_project_in_full() {
    let app = app().await;
    let admin = login(&app, "admin@system.com", "admin123").await;

    let (_, before) = send(&app, Method::GET, "/api/projects/proj-10", Some(&admin), None).await;

    let input = json!({
        "name": "Venueideas",
        "description": "Venue discovery",
        "projectType": "website",
        "clientId": "user-5",
        "webDeveloperId": "user-3",
        "currentStage": "design",
        "status": "paused"
    });
    let (status, after) = send(&app, Method::PUT, "/api/projects/proj-10", Some(&admin), Some(input)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["id"], "proj-10");
    assert_eq!(after["createdAt"], before["createdAt"]);
    assert_ne!(after["updatedAt"], before["updatedAt"]);
    assert_eq!(after["webDeveloperId"], "user-3");
    assert_eq!(after["status"], "paused");

    let dev = login(&app, "dev@system.com", "dev123").await;
    let (status, _) = send(&app, Method::DELETE, "/api/projects/proj-10", Some(&dev), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn social_project_needs_platforms() {
    let app = app().await;
    let admin = login(&app, "admin@system.com", "admin123").await;
    let input = json!({
        "name": "Spring push",
        "projectType": "social_media",
        "clientId": "user-6",
        "socialMediaCoordinatorId": "user-4"
    });
    let (status, _) = send(&app, Method::POST, "/api/projects", Some(&admin), Some(input)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ticket_mutation_enforces_management_rule() {
    let app = app().await;

    // ticket-1 is assigned to user-2 and was opened by user-5
    let other_dev = login(&app, "jane.dev@system.com", "dev123").await;
    let update = json!({ "status": "resolved" });
    let (status, _) = send(&app, Method::PUT, "/api/tickets/ticket-1", Some(&other_dev), Some(update.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let coordinator = login(&app, "social@system.com", "social123").await;
    let (status, _) = send(&app, Method::PUT, "/api/tickets/ticket-1", Some(&coordinator), Some(update.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let dev = login(&app, "dev@system.com", "dev123").await;
    let (status, body) = send(&app, Method::PUT, "/api/tickets/ticket-1", Some(&dev), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "resolved");
    assert!(body["resolvedAt"].is_string());
}

#[tokio::test]
async fn client_opens_ticket_and_comments() {
    let app = app().await;
    let client = login(&app, "client@system.com", "client123").await;

    let (status, ticket) = send(
        &app,
        Method::POST,
        "/api/tickets",
        Some(&client),
        Some(json!({
            "projectId": "proj-6",
            "title": "Course page typo",
            "type": "content_change"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ticket["assignedTo"], "user-2");
    assert_eq!(ticket["priority"], "medium");
    let id = ticket["id"].as_str().unwrap();

    let uri = format!("/api/tickets/{id}/comments");
    let (status, _) = send(&app, Method::POST, &uri, Some(&client), Some(json!({ "content": "Second paragraph" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, comments) = send(&app, Method::GET, &uri, Some(&client), None).await;
    assert_eq!(comments["comments"].as_array().unwrap().len(), 1);

    // Someone else's project
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/tickets",
        Some(&client),
        Some(json!({ "projectId": "proj-3", "title": "Nope", "type": "bug_report" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn ticket_list_filters_within_scope() {
    let app = app().await;
    let coordinator = login(&app, "social@system.com", "social123").await;

    let (_, body) = send(&app, Method::GET, "/api/tickets", Some(&coordinator), None).await;
    assert_eq!(body["tickets"].as_array().unwrap().len(), 9);

    let (_, body) = send(&app, Method::GET, "/api/tickets?status=open", Some(&coordinator), None).await;
    let open = body["tickets"].as_array().unwrap();
    assert_eq!(open.len(), 2);
    assert!(open.iter().all(|t| t["status"] == "open"));

    let (_, body) = send(&app, Method::GET, "/api/tickets?projectId=proj-4", Some(&coordinator), None).await;
    assert!(body["tickets"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn role_switch_changes_visibility() {
    let app = app().await;
    let token = login(&app, "client@system.com", "client123").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/switch-role",
        Some(&token),
        Some(json!({ "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let switched = body["token"].as_str().unwrap();

    let (_, body) = send(&app, Method::GET, "/api/projects", Some(switched), None).await;
    assert_eq!(body["projects"].as_array().unwrap().len(), 25);

    let (_, session) = send(&app, Method::GET, "/api/auth/session", Some(switched), None).await;
    assert_eq!(session["role"], "admin");
}

#[tokio::test]
async fn role_switch_can_be_disabled() {
    let app = app_with(Config {
        allow_role_switch: false,
        ..Config::default()
    })
    .await;
    let token = login(&app, "client@system.com", "client123").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/switch-role",
        Some(&token),
        Some(json!({ "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn stage_and_analytics_routes() {
    let app = app().await;
    let dev = login(&app, "dev@system.com", "dev123").await;

    let (status, project) = send(
        &app,
        Method::POST,
        "/api/projects/proj-10/stage",
        Some(&dev),
        Some(json!({ "stage": "design" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["currentStage"], "design");

    let (_, stages) = send(&app, Method::GET, "/api/projects/proj-10/stages", Some(&dev), None).await;
    assert_eq!(stages["stages"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/projects/proj-10/analytics/website",
        Some(&dev),
        Some(json!({
            "date": "2025-03-01T00:00:00Z",
            "pageViews": 300,
            "uniqueVisitors": 210,
            "bounceRate": 40.5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, analytics) = send(&app, Method::GET, "/api/projects/proj-10/analytics", Some(&dev), None).await;
    assert_eq!(analytics["website"].as_array().unwrap().len(), 1);

    let (_, activities) = send(&app, Method::GET, "/api/projects/proj-10/activities", Some(&dev), None).await;
    let actions: Vec<_> = activities["activities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap().to_string())
        .collect();
    assert!(actions.contains(&"stage_updated".to_string()));
    assert!(actions.contains(&"analytics_added".to_string()));
}

#[tokio::test]
async fn admin_reset_restores_seed() {
    let app = app().await;
    let admin = login(&app, "admin@system.com", "admin123").await;

    let (status, _) = send(&app, Method::DELETE, "/api/projects/proj-1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, "/api/projects/proj-1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, "/api/admin/reset", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/api/projects/proj-1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn dashboard_reports_role_view() {
    let app = app().await;
    let client = login(&app, "client@system.com", "client123").await;

    let (status, body) = send(&app, Method::GET, "/api/dashboard", Some(&client), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "client");
    assert_eq!(body["projectCount"], 14);
    assert!(body.get("userCount").is_none());
}

#[tokio::test]
async fn project_tickets_hide_other_peoples_tickets() {
    let app = app().await;
    let client = login(&app, "client@system.com", "client123").await;

    let (status, body) = send(&app, Method::GET, "/api/projects/proj-1/tickets", Some(&client), None).await;
    assert_eq!(status, StatusCode::OK);
    let tickets = body["tickets"].as_array().unwrap();
    assert_eq!(tickets.len(), 2);
    assert!(tickets.iter().all(|t| t["createdBy"] == "user-5"));
    assert!(tickets.iter().all(|t| t["id"] != "ticket-6"));

    let (status, _) = send(&app, Method::GET, "/api/tickets/ticket-6", Some(&client), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_admin_cannot_pick_assignee() {
    let app = app().await;
    let client = login(&app, "client@system.com", "client123").await;
    let ticket = json!({
        "projectId": "proj-1",
        "title": "Footer colour",
        "type": "design_update",
        "assignedTo": "user-4"
    });

    let (status, _) = send(&app, Method::POST, "/api/tickets", Some(&client), Some(ticket.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = login(&app, "admin@system.com", "admin123").await;
    let (status, body) = send(&app, Method::POST, "/api/tickets", Some(&admin), Some(ticket)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assignedTo"], "user-4");
}

#[tokio::test]
async fn user_list_supports_search_and_counts() {
    let app = app().await;
    let admin = login(&app, "admin@system.com", "admin123").await;

    let (status, body) = send(&app, Method::GET, "/api/users?search=Jane", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["roleName"], "Web Developer");
    assert_eq!(body["stats"]["total"], 6);
    assert_eq!(body["stats"]["developers"], 2);
    assert_eq!(body["stats"]["active"], 6);

    let (_, body) = send(&app, Method::GET, "/api/users?role=client&active=true", Some(&admin), None).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn user_detail_includes_related_work() {
    let app = app().await;
    let admin = login(&app, "admin@system.com", "admin123").await;

    let (status, body) = send(&app, Method::GET, "/api/users/user-5", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "user-5");
    assert!(body.get("password").is_none());
    // 11 websites and 3 campaigns
    assert_eq!(body["stats"]["totalProjects"], 14);
    assert_eq!(body["projects"].as_array().unwrap().len(), 14);
    assert_eq!(body["stats"]["createdTickets"], 5);
    assert_eq!(body["stats"]["assignedTickets"], 0);

    let (status, _) = send(&app, Method::GET, "/api/users/user-404", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
