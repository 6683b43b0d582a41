//! Process-wide configuration, read once at startup and read-only after.

use chrono::Duration;

/// Server configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub auth_secret: String,
    pub token_ttl: Duration,
    /// Optional `(username, password)` pair for seeding an admin account at
    /// startup (the in-memory store starts empty on every boot).
    pub admin_bootstrap: Option<(String, String)>,
    /// Configured answer for the stub recognition model, when set.
    pub stub_prediction: Option<(String, f64)>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let auth_secret = std::env::var("AUTH_SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("AUTH_SECRET_KEY not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let token_ttl_mins = std::env::var("AUTH_EXPIRATION_MINS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(30);

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let admin_bootstrap = match (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) => Some((username, password)),
            _ => None,
        };

        let stub_prediction = match (
            std::env::var("CELEB_STUB_NAME"),
            std::env::var("CELEB_STUB_CONFIDENCE"),
        ) {
            (Ok(name), Ok(confidence)) => {
                confidence.parse::<f64>().ok().map(|c| (name, c))
            }
            _ => None,
        };

        Self {
            bind_addr,
            auth_secret,
            token_ttl: Duration::minutes(token_ttl_mins),
            admin_bootstrap,
            stub_prediction,
        }
    }
}
