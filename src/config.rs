use serde::Deserialize;

use crate::users::password::BCRYPT_COST;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    /// Where the users router is mounted; also the prefix of `Location` headers.
    pub users_base_path: String,
    pub bcrypt_cost: u32,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let db_max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let users_base_path = normalize_base_path(
            &std::env::var("USERS_BASE_PATH").unwrap_or_else(|_| "/api/users".into()),
        );
        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| parse_cost(&v))
            .unwrap_or(BCRYPT_COST);
        let server = ServerConfig {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
        };
        Ok(Self {
            database_url,
            db_max_connections,
            users_base_path,
            bcrypt_cost,
            server,
        })
    }
}

// bcrypt accepts costs 4..=31 only.
fn parse_cost(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|c| (4..=31).contains(c))
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
