use std::{net::SocketAddr, path::PathBuf, time::Duration};

/// Per-address limits for the login and registration endpoints.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// One request is replenished every `replenish_interval`.
    pub replenish_interval: Duration,
    pub burst: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub audit_log_path: PathBuf,
    pub secret_key: Option<String>,
    pub session_ttl: Duration,
    pub request_timeout: Duration,
    pub rate_limit: RateLimitConfig,
    pub cookie_secure: bool,
    pub admin_email: Option<String>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn env_number<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("SB_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .expect("Invalid SB_LISTEN_ADDR");
        let db_path = env_or("SB_DB_PATH", "./instance/smartbudget.db");
        let audit_log_path = PathBuf::from(env_or("SB_AUDIT_LOG_PATH", "logs/audit.log"));
        let session_ttl_secs: u64 = env_number("SB_SESSION_TTL_SECS", 60 * 60 * 24);
        let timeout_ms: u64 = env_number("SB_REQUEST_TIMEOUT_MS", 30000);

        Self {
            listen_addr,
            db_path,
            audit_log_path,
            secret_key: env_non_empty("SB_SECRET_KEY"),
            session_ttl: Duration::from_secs(session_ttl_secs),
            request_timeout: Duration::from_millis(timeout_ms),
            rate_limit: RateLimitConfig {
                enabled: env_flag("SB_RATE_LIMIT_ENABLED", true),
                replenish_interval: Duration::from_secs(
                    env_number("SB_RATE_LIMIT_REPLENISH_SECS", 12u64).max(1),
                ),
                burst: env_number("SB_RATE_LIMIT_BURST", 5u32).max(1),
            },
            cookie_secure: env_flag("SB_COOKIE_SECURE", false),
            admin_email: env_non_empty("SB_ADMIN_EMAIL"),
        }
    }
}
