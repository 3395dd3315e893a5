use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub token_ttl_minutes: i64,
    pub free_note_limit: i64,
    pub cors_origins: Vec<String>,
    pub max_body_size: usize,
    pub seed: bool,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("NOTES_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid NOTES_HOST: {e}"))?;

        let port: u16 = env_or("NOTES_PORT", "5000")
            .parse()
            .map_err(|e| format!("Invalid NOTES_PORT: {e}"))?;

        let token_ttl_minutes: i64 = env_or("NOTES_TOKEN_TTL_MINUTES", "60")
            .parse()
            .map_err(|e| format!("Invalid NOTES_TOKEN_TTL_MINUTES: {e}"))?;

        let free_note_limit: i64 = env_or("NOTES_FREE_NOTE_LIMIT", "3")
            .parse()
            .map_err(|e| format!("Invalid NOTES_FREE_NOTE_LIMIT: {e}"))?;

        // Empty list means any origin is allowed
        let cors_origins: Vec<String> = env_or("NOTES_CORS_ORIGINS", "")
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        let max_body_size: usize = env_or("NOTES_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid NOTES_MAX_BODY_SIZE: {e}"))?;

        let seed = parse_bool("NOTES_SEED", &env_or("NOTES_SEED", "true"))?;

        let log_level = env_or("NOTES_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            token_ttl_minutes,
            free_note_limit,
            cors_origins,
            max_body_size,
            seed,
            log_level,
        })
    }
}

/// Settings for the notes client: where the API lives and where the
/// session is persisted between runs.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, String> {
        ClientConfig::new(
            &env_or("NOTES_API_URL", "http://localhost:5000"),
            env_or("NOTES_SESSION_FILE", ".notes-session.json"),
        )
    }

    pub fn new(api_url: &str, session_file: impl Into<PathBuf>) -> Result<Self, String> {
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(format!("Invalid NOTES_API_URL: {api_url}"));
        }

        Ok(ClientConfig {
            api_url: api_url.to_string(),
            session_file: session_file.into(),
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("Invalid {key}: {other}")),
    }
}
