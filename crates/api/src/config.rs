use huma_core::contact::DEFAULT_CONTACT_PHONE;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for background tasks to stop after shutdown (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// Periodic project list refresh; `0` disables it (default: `0`).
    pub refresh_interval_secs: u64,
    /// Drafts untouched this long are discarded with their staged media;
    /// `0` keeps drafts forever (default: `3600`).
    pub draft_idle_secs: u64,
    /// Messaging number for contact links and chat hand-off.
    pub contact_phone: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `3000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                     |
    /// | `REFRESH_INTERVAL_SECS` | `0`                      |
    /// | `DRAFT_IDLE_SECS`       | `3600`                   |
    /// | `CONTACT_PHONE`         | `+5492612765652`         |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let refresh_interval_secs: u64 = std::env::var("REFRESH_INTERVAL_SECS")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("REFRESH_INTERVAL_SECS must be a valid u64");

        let draft_idle_secs: u64 = std::env::var("DRAFT_IDLE_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("DRAFT_IDLE_SECS must be a valid u64");

        let contact_phone =
            std::env::var("CONTACT_PHONE").unwrap_or_else(|_| DEFAULT_CONTACT_PHONE.into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            refresh_interval_secs,
            draft_idle_secs,
            contact_phone,
        }
    }
}
