//! Fixed dataset the store falls back to and `initialize` writes.

use chrono::{DateTime, TimeZone, Utc};

use crate::db::models::{
    Activity, Comment, Priority, Project, ProjectStageHistory, ProjectStatus, ProjectType, Role,
    SocialMediaAnalytics, Stage, StageStatus, Ticket, TicketStatus, TicketType, User,
    WebsiteAnalytics,
};

type Ymd = (i32, u32, u32);

fn at(y: i32, m: u32, d: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, hour, min, 0)
        .single()
        .expect("valid seed timestamp")
}

fn day((y, m, d): Ymd) -> DateTime<Utc> {
    at(y, m, d, 0, 0)
}

fn user(id: &str, email: &str, password: &str, name: &str, phone: &str, role: Role, joined: Ymd) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        full_name: name.to_string(),
        phone: phone.to_string(),
        role,
        is_active: true,
        created_at: day(joined),
        updated_at: day(joined),
    }
}

pub fn users() -> Vec<User> {
    vec![
        user("user-1", "admin@system.com", "admin123", "Admin User", "+27821234567", Role::Admin, (2025, 1, 1)),
        user("user-2", "dev@system.com", "dev123", "John Developer", "+27821234568", Role::WebDeveloper, (2025, 1, 2)),
        user("user-3", "jane.dev@system.com", "dev123", "Jane Smith", "+27821234569", Role::WebDeveloper, (2025, 1, 2)),
        user("user-4", "social@system.com", "social123", "Sarah Cohen", "+27821234570", Role::SocialMediaCoordinator, (2025, 1, 3)),
        user("user-5", "client@system.com", "client123", "Michael Client", "+27821234571", Role::Client, (2025, 1, 4)),
        user("user-6", "client2@company.com", "client123", "Emma Business", "+27821234572", Role::Client, (2025, 1, 5)),
    ]
}

/// id, name, description, client, developer, coordinator, stage, url,
/// created, updated, launched
type WebsiteRow<'a> = (
    &'a str,
    &'a str,
    &'a str,
    &'a str,
    Option<&'a str>,
    Option<&'a str>,
    Stage,
    Option<&'a str>,
    Ymd,
    Ymd,
    Option<Ymd>,
);

const WEBSITES: &[WebsiteRow<'static>] = &[
    (
        "proj-1",
        "SpecCon",
        "Main SpecCon corporate website - showcasing our services and portfolio",
        "user-5",
        Some("user-2"),
        Some("user-4"),
        Stage::Maintenance,
        Some("https://speccon.co.za"),
        (2024, 6, 1),
        (2025, 2, 8),
        Some((2024, 8, 15)),
    ),
    (
        "proj-2",
        "Andebe",
        "Andebe Skills Development & Training platform",
        "user-5",
        Some("user-2"),
        Some("user-4"),
        Stage::Development,
        Some("https://andebe.co.za"),
        (2024, 9, 15),
        (2025, 2, 9),
        None,
    ),
    (
        "proj-3",
        "Megrolowveld",
        "Megrolowveld business and services website",
        "user-6",
        Some("user-3"),
        Some("user-4"),
        Stage::Testing,
        Some("https://megrolowveld.co.za"),
        (2024, 10, 1),
        (2025, 2, 5),
        None,
    ),
    (
        "proj-4",
        "Skills Development Facilitation",
        "Skills development facilitation and training coordination platform",
        "user-5",
        Some("user-2"),
        None,
        Stage::Design,
        None,
        (2024, 11, 20),
        (2025, 2, 8),
        None,
    ),
    (
        "proj-5",
        "InfinityNPO",
        "Infinity NPO - Non-profit organization website for community development",
        "user-6",
        Some("user-3"),
        Some("user-4"),
        Stage::Launch,
        Some("https://infinitynpo.co.za"),
        (2024, 8, 10),
        (2025, 2, 6),
        Some((2024, 12, 1)),
    ),
    (
        "proj-6",
        "InfinityLearn",
        "InfinityLearn e-learning platform for online education and training",
        "user-5",
        Some("user-2"),
        Some("user-4"),
        Stage::Development,
        Some("https://infinitylearn.co.za"),
        (2024, 9, 1),
        (2025, 2, 9),
        None,
    ),
    (
        "proj-7",
        "Elearning",
        "General e-learning platform with course management and student tracking",
        "user-6",
        Some("user-3"),
        None,
        Stage::Development,
        None,
        (2024, 10, 15),
        (2025, 2, 8),
        None,
    ),
    (
        "proj-8",
        "TAP",
        "Training and Assessment Platform for skills development",
        "user-5",
        Some("user-2"),
        Some("user-4"),
        Stage::Testing,
        Some("https://tap.co.za"),
        (2024, 7, 20),
        (2025, 2, 7),
        None,
    ),
    (
        "proj-9",
        "LMS",
        "Learning Management System for comprehensive training programs",
        "user-6",
        Some("user-3"),
        Some("user-4"),
        Stage::Launch,
        Some("https://lms.speccon.co.za"),
        (2024, 5, 15),
        (2025, 2, 5),
        Some((2024, 11, 1)),
    ),
    (
        "proj-10",
        "Venueideas",
        "Wedding and event venue booking and discovery platform",
        "user-5",
        Some("user-2"),
        None,
        Stage::Planning,
        None,
        (2025, 1, 10),
        (2025, 2, 8),
        None,
    ),
    (
        "proj-11",
        "Weddingideas",
        "Complete wedding planning resource and vendor directory",
        "user-6",
        Some("user-3"),
        Some("user-4"),
        Stage::Design,
        None,
        (2024, 12, 5),
        (2025, 2, 6),
        None,
    ),
    (
        "proj-12",
        "Workreadiness",
        "Work readiness training and assessment platform for job seekers",
        "user-5",
        Some("user-2"),
        Some("user-4"),
        Stage::Development,
        Some("https://workreadiness.co.za"),
        (2024, 8, 25),
        (2025, 2, 9),
        None,
    ),
    (
        "proj-13",
        "Specconacademy",
        "SpecCon Academy - comprehensive training academy platform",
        "user-6",
        Some("user-3"),
        None,
        Stage::Testing,
        Some("https://specconacademy.co.za"),
        (2024, 7, 10),
        (2025, 2, 7),
        None,
    ),
    (
        "proj-14",
        "Trouidees",
        "Wedding ideas and planning inspiration platform (Afrikaans)",
        "user-5",
        Some("user-2"),
        Some("user-4"),
        Stage::Design,
        None,
        (2025, 1, 5),
        (2025, 2, 8),
        None,
    ),
    (
        "proj-15",
        "Employment Equity Act",
        "Employment Equity Act compliance and reporting platform",
        "user-6",
        Some("user-3"),
        None,
        Stage::Planning,
        None,
        (2025, 1, 20),
        (2025, 2, 5),
        None,
    ),
    (
        "proj-16",
        "Leeromtelees",
        "Afrikaans educational platform for reading and learning",
        "user-5",
        Some("user-2"),
        Some("user-4"),
        Stage::Development,
        None,
        (2024, 11, 1),
        (2025, 2, 9),
        None,
    ),
    (
        "proj-17",
        "Grade.co.za",
        "Grade tracking and academic performance management system",
        "user-6",
        Some("user-3"),
        Some("user-4"),
        Stage::Testing,
        Some("https://grade.co.za"),
        (2024, 9, 20),
        (2025, 2, 8),
        None,
    ),
    (
        "proj-18",
        "SpecCon Buddies Primary Schools",
        "Primary school support and buddy system platform",
        "user-5",
        Some("user-2"),
        None,
        Stage::Launch,
        Some("https://buddies.speccon.co.za"),
        (2024, 6, 15),
        (2025, 2, 6),
        Some((2024, 10, 20)),
    ),
    (
        "proj-19",
        "Coloring",
        "Interactive coloring and creative activities platform for children",
        "user-6",
        Some("user-3"),
        Some("user-4"),
        Stage::Development,
        None,
        (2024, 12, 10),
        (2025, 2, 9),
        None,
    ),
    (
        "proj-20",
        "Classrooms",
        "Virtual classroom management and online teaching platform",
        "user-5",
        Some("user-2"),
        Some("user-4"),
        Stage::Testing,
        Some("https://classrooms.speccon.co.za"),
        (2024, 8, 1),
        (2025, 2, 7),
        None,
    ),
];

/// Google Analytics property and view ids for the sites that have them.
const GA_IDS: &[(&str, &str, &str)] = &[
    ("proj-1", "G-XXXXXXXXXX", "123456789"),
    ("proj-2", "G-YYYYYYYYYY", "987654321"),
];

fn blank_project(id: &str, name: &str, description: &str, project_type: ProjectType, client: &str) -> Project {
    let now = Utc::now();
    Project {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        project_type,
        client_id: client.to_string(),
        web_developer_id: None,
        social_media_coordinator_id: None,
        current_stage: Stage::Planning,
        status: ProjectStatus::Active,
        website_url: None,
        google_analytics_property_id: None,
        google_analytics_view_id: None,
        social_media_platforms: None,
        campaign_goals: None,
        target_audience: None,
        notes: None,
        created_at: now,
        updated_at: now,
        launch_date: None,
    }
}

fn website(row: &WebsiteRow<'_>) -> Project {
    let &(id, name, description, client, developer, coordinator, stage, url, created, updated, launched) = row;
    let ga = GA_IDS.iter().find(|(pid, _, _)| *pid == id);

    Project {
        web_developer_id: developer.map(str::to_string),
        social_media_coordinator_id: coordinator.map(str::to_string),
        current_stage: stage,
        website_url: url.map(str::to_string),
        google_analytics_property_id: ga.map(|(_, property, _)| property.to_string()),
        google_analytics_view_id: ga.map(|(_, _, view)| view.to_string()),
        created_at: day(created),
        updated_at: day(updated),
        launch_date: launched.map(day),
        ..blank_project(id, name, description, ProjectType::Website, client)
    }
}

#[allow(clippy::too_many_arguments)]
fn campaign(
    id: &str,
    name: &str,
    description: &str,
    client: &str,
    stage: Stage,
    platforms: &[&str],
    goals: &str,
    audience: &str,
    created: Ymd,
    updated: Ymd,
    launched: Option<Ymd>,
) -> Project {
    Project {
        social_media_coordinator_id: Some("user-4".to_string()),
        current_stage: stage,
        social_media_platforms: Some(platforms.iter().map(|p| p.to_string()).collect()),
        campaign_goals: Some(goals.to_string()),
        target_audience: Some(audience.to_string()),
        created_at: day(created),
        updated_at: day(updated),
        launch_date: launched.map(day),
        ..blank_project(id, name, description, ProjectType::SocialMedia, client)
    }
}

pub fn projects() -> Vec<Project> {
    let mut projects: Vec<Project> = WEBSITES.iter().map(website).collect();

    projects.push(Project {
        notes: Some("Focus on skills development and training services".to_string()),
        ..campaign(
            "proj-21",
            "SpecCon Social Media Campaign Q1 2025",
            "Comprehensive social media strategy for SpecCon brand awareness and lead generation",
            "user-5",
            Stage::Launch,
            &["facebook", "instagram", "linkedin", "twitter"],
            "Increase brand awareness by 40%, generate 200+ qualified leads, boost engagement rate to 8%",
            "Business owners, HR managers, training coordinators in South Africa",
            (2024, 12, 15),
            (2025, 2, 9),
            Some((2025, 1, 1)),
        )
    });
    projects.push(campaign(
        "proj-22",
        "InfinityNPO Community Outreach",
        "Social media campaign to raise awareness for community development initiatives",
        "user-6",
        Stage::Maintenance,
        &["facebook", "instagram", "twitter"],
        "Increase volunteer sign-ups by 50%, raise R100k in donations, reach 50k people monthly",
        "Community members, potential donors, volunteers aged 25-55",
        (2024, 11, 20),
        (2025, 2, 8),
        Some((2024, 12, 1)),
    ));
    projects.push(campaign(
        "proj-23",
        "Wedding Ideas Influencer Campaign",
        "Influencer partnership campaign for wedding and venue booking platform",
        "user-5",
        Stage::Planning,
        &["instagram", "tiktok", "facebook"],
        "Partner with 20 wedding influencers, reach 500k engaged couples, drive 10k website visits",
        "Engaged couples aged 24-35, wedding planners, event coordinators",
        (2025, 1, 15),
        (2025, 2, 9),
        None,
    ));
    projects.push(campaign(
        "proj-24",
        "Andebe Skills Development Launch",
        "Product launch campaign for new online training platform",
        "user-5",
        Stage::Development,
        &["linkedin", "facebook", "youtube"],
        "Generate 500 course enrollments, establish thought leadership, reach 100k professionals",
        "Working professionals, career changers, recent graduates seeking upskilling",
        (2025, 1, 20),
        (2025, 2, 8),
        None,
    ));
    projects.push(campaign(
        "proj-25",
        "Educational Content Series - Grade.co.za",
        "Educational social media content to promote academic tracking platform",
        "user-6",
        Stage::Launch,
        &["facebook", "instagram", "twitter"],
        "Engage 5k parents, increase app downloads by 200%, position as education leader",
        "Parents of school-aged children, teachers, education administrators",
        (2024, 12, 1),
        (2025, 2, 7),
        Some((2025, 1, 15)),
    ));

    projects
}

#[allow(clippy::too_many_arguments)]
fn ticket(
    id: &str,
    project: &str,
    created_by: &str,
    assigned_to: Option<&str>,
    title: &str,
    description: &str,
    ticket_type: TicketType,
    priority: Priority,
    status: TicketStatus,
    created: Ymd,
    updated: Ymd,
) -> Ticket {
    Ticket {
        id: id.to_string(),
        project_id: project.to_string(),
        created_by: created_by.to_string(),
        assigned_to: assigned_to.map(str::to_string),
        title: title.to_string(),
        description: description.to_string(),
        ticket_type,
        priority,
        status,
        created_at: day(created),
        updated_at: day(updated),
        // Finished tickets were resolved on their last update
        resolved_at: status.is_done().then(|| day(updated)),
    }
}

pub fn tickets() -> Vec<Ticket> {
    use Priority::*;
    use TicketStatus::*;
    use TicketType::*;

    vec![
        ticket(
            "ticket-1",
            "proj-1",
            "user-5",
            Some("user-2"),
            "Update homepage hero image",
            "The current hero image needs to be replaced with the new brand imagery provided in the project assets folder.",
            ContentChange,
            Medium,
            InProgress,
            (2025, 2, 1),
            (2025, 2, 8),
        ),
        ticket(
            "ticket-2",
            "proj-1",
            "user-5",
            Some("user-2"),
            "Fix mobile navigation menu",
            "The hamburger menu on mobile devices is not opening correctly. It seems to be a JavaScript issue.",
            BugReport,
            High,
            Open,
            (2025, 2, 7),
            (2025, 2, 7),
        ),
        ticket(
            "ticket-3",
            "proj-2",
            "user-6",
            Some("user-3"),
            "Add product filtering functionality",
            "Users should be able to filter products by category, price range, and availability.",
            FeatureRequest,
            High,
            InProgress,
            (2025, 2, 3),
            (2025, 2, 9),
        ),
        ticket(
            "ticket-4",
            "proj-2",
            "user-6",
            Some("user-3"),
            "Update product descriptions",
            "Need to update all product descriptions with the new copywriting provided by the marketing team.",
            ContentChange,
            Low,
            Resolved,
            (2025, 1, 28),
            (2025, 2, 5),
        ),
        ticket(
            "ticket-5",
            "proj-3",
            "user-5",
            Some("user-2"),
            "Redesign contact form",
            "The contact form needs a visual redesign to match the new brand guidelines.",
            DesignUpdate,
            Medium,
            Resolved,
            (2025, 1, 25),
            (2025, 2, 2),
        ),
        ticket(
            "ticket-6",
            "proj-1",
            "user-2",
            Some("user-2"),
            "Optimize page load speed",
            "Homepage is loading slowly. Need to optimize images and lazy load components.",
            BugReport,
            High,
            Open,
            (2025, 2, 8),
            (2025, 2, 8),
        ),
        ticket(
            "ticket-7",
            "proj-4",
            "user-6",
            None,
            "Add email notification system",
            "Customers should receive email confirmations when they make a reservation.",
            FeatureRequest,
            Critical,
            Open,
            (2025, 2, 9),
            (2025, 2, 9),
        ),
        ticket(
            "ticket-8",
            "proj-2",
            "user-6",
            Some("user-3"),
            "Shopping cart calculation error",
            "The shopping cart is not calculating the total correctly when discount codes are applied.",
            BugReport,
            Critical,
            InProgress,
            (2025, 2, 8),
            (2025, 2, 9),
        ),
        ticket(
            "ticket-9",
            "proj-3",
            "user-5",
            Some("user-2"),
            "Update team member bios",
            "Need to add two new team members to the About page and update existing bios.",
            ContentChange,
            Low,
            Closed,
            (2025, 1, 20),
            (2025, 1, 28),
        ),
        ticket(
            "ticket-10",
            "proj-5",
            "user-5",
            Some("user-2"),
            "SEO meta tags optimization",
            "Update meta descriptions and keywords for better search engine visibility.",
            ContentChange,
            Medium,
            Resolved,
            (2025, 1, 30),
            (2025, 2, 4),
        ),
    ]
}

fn comment(id: &str, ticket: &str, user: &str, content: &str, posted: DateTime<Utc>) -> Comment {
    Comment {
        id: id.to_string(),
        ticket_id: ticket.to_string(),
        user_id: user.to_string(),
        content: content.to_string(),
        created_at: posted,
        updated_at: posted,
        is_edited: false,
    }
}

pub fn comments() -> Vec<Comment> {
    vec![
        comment(
            "comment-1",
            "ticket-1",
            "user-2",
            "I've started working on this. The new image has been uploaded and I'm testing it across different screen sizes.",
            at(2025, 2, 8, 10, 30),
        ),
        comment(
            "comment-2",
            "ticket-1",
            "user-5",
            "Great! Could you also ensure the image is optimized for mobile devices?",
            at(2025, 2, 8, 11, 15),
        ),
        comment(
            "comment-3",
            "ticket-3",
            "user-3",
            "I've implemented the category filtering. Working on price range filtering now.",
            at(2025, 2, 9, 9, 0),
        ),
        comment(
            "comment-4",
            "ticket-8",
            "user-3",
            "Found the issue! The discount calculation was not accounting for tax. Fixing it now.",
            at(2025, 2, 9, 14, 20),
        ),
    ]
}

pub fn website_analytics() -> Vec<WebsiteAnalytics> {
    let rows: [(&str, &str, Ymd, u64, u64, f64); 4] = [
        ("analytics-1", "proj-1", (2025, 2, 1), 1250, 890, 42.5),
        ("analytics-2", "proj-1", (2025, 2, 8), 1580, 1120, 38.2),
        ("analytics-3", "proj-3", (2025, 2, 1), 2340, 1650, 35.8),
        ("analytics-4", "proj-3", (2025, 2, 8), 2890, 2010, 33.1),
    ];

    rows.into_iter()
        .map(|(id, project, date, page_views, unique_visitors, bounce_rate)| {
            let date = day(date);
            WebsiteAnalytics {
                id: id.to_string(),
                project_id: project.to_string(),
                date,
                page_views,
                unique_visitors,
                bounce_rate,
                recorded_by: "user-2".to_string(),
                created_at: date + chrono::Duration::days(1),
            }
        })
        .collect()
}

pub fn social_analytics() -> Vec<SocialMediaAnalytics> {
    // id, project, platform, date, posts, engagement, reach, followers, likes, comments, shares
    let rows: [(&str, &str, &str, Ymd, u64, u64, u64, u64, u64, u64, Option<u64>); 4] = [
        ("social-1", "proj-1", "facebook", (2025, 2, 1), 5, 342, 4500, 2300, 280, 42, Some(20)),
        ("social-2", "proj-1", "instagram", (2025, 2, 1), 7, 589, 6200, 3100, 520, 69, None),
        ("social-3", "proj-3", "linkedin", (2025, 2, 1), 3, 156, 2800, 980, 120, 36, None),
        ("social-4", "proj-2", "twitter", (2025, 2, 5), 8, 421, 5100, 1850, 340, 51, Some(30)),
    ];

    rows.into_iter()
        .map(
            |(id, project, platform, date, posts, engagement, reach, followers, likes, comments, shares)| {
                let date = day(date);
                SocialMediaAnalytics {
                    id: id.to_string(),
                    project_id: project.to_string(),
                    platform: platform.to_string(),
                    date,
                    posts,
                    engagement,
                    reach,
                    followers,
                    likes: Some(likes),
                    comments: Some(comments),
                    shares,
                    recorded_by: "user-4".to_string(),
                    created_at: date + chrono::Duration::days(1),
                }
            },
        )
        .collect()
}

pub fn stage_history() -> Vec<ProjectStageHistory> {
    vec![
        ProjectStageHistory {
            id: "stage-1".to_string(),
            project_id: "proj-1".to_string(),
            stage: Stage::Planning,
            start_date: day((2025, 1, 15)),
            end_date: Some(day((2025, 1, 22))),
            status: StageStatus::Completed,
            completed_by: Some("user-2".to_string()),
        },
        ProjectStageHistory {
            id: "stage-2".to_string(),
            project_id: "proj-1".to_string(),
            stage: Stage::Design,
            start_date: day((2025, 1, 22)),
            end_date: Some(day((2025, 1, 29))),
            status: StageStatus::Completed,
            completed_by: Some("user-2".to_string()),
        },
        ProjectStageHistory {
            id: "stage-3".to_string(),
            project_id: "proj-1".to_string(),
            stage: Stage::Development,
            start_date: day((2025, 1, 29)),
            end_date: None,
            status: StageStatus::InProgress,
            completed_by: None,
        },
    ]
}

pub fn activities() -> Vec<Activity> {
    let rows = [
        (
            "activity-1",
            "user-2",
            "proj-1",
            "ticket_updated",
            "Updated ticket status to In Progress for 'Update homepage hero image'",
            at(2025, 2, 8, 10, 30),
        ),
        (
            "activity-2",
            "user-6",
            "proj-2",
            "ticket_created",
            "Created new ticket 'Shopping cart calculation error'",
            at(2025, 2, 8, 14, 20),
        ),
        (
            "activity-3",
            "user-4",
            "proj-1",
            "analytics_added",
            "Added social media analytics for Facebook",
            at(2025, 2, 9, 9, 0),
        ),
        (
            "activity-4",
            "user-3",
            "proj-2",
            "stage_updated",
            "Moved project to Testing stage",
            at(2025, 2, 5, 16, 45),
        ),
    ];

    rows.into_iter()
        .map(|(id, user, project, action, description, created_at)| Activity {
            id: id.to_string(),
            user_id: user.to_string(),
            project_id: project.to_string(),
            action: action.to_string(),
            description: description.to_string(),
            created_at,
        })
        .collect()
}
