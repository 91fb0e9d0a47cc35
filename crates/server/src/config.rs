use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub storage_namespace: String,
    pub seed_on_start: bool,
    /// Lets any signed-in user re-issue their token with another role,
    /// admin included. Only for demo deployments.
    pub allow_role_switch: bool,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str, default: bool| {
            get(name)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(default)
        };
        let seed_on_start = flag("SEED_ON_START", true);

        Self {
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:./data/marketdesk.db?mode=rwc".to_string()),
            jwt_secret: get("JWT_SECRET")
                .unwrap_or_else(|| "development-secret-change-in-production".to_string()),
            storage_namespace: get("STORAGE_NAMESPACE")
                .unwrap_or_else(|| "marketing_management_website".to_string()),
            seed_on_start,
            // Follows SEED_ON_START unless set explicitly: a seeded demo store
            // gets the role switcher, a persistent one does not.
            allow_role_switch: flag("ALLOW_ROLE_SWITCH", seed_on_start),
            static_dir: get("STATIC_DIR").unwrap_or_else(|| "static".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "development-secret-change-in-production".to_string(),
            storage_namespace: "marketing_management_website".to_string(),
            seed_on_start: true,
            allow_role_switch: true,
            static_dir: "static".to_string(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
