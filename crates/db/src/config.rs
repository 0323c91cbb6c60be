/// Connection settings for the hosted table and storage service.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, without trailing slash.
    pub url: String,
    /// Anonymous (publishable) API key.
    pub key: String,
    /// Table holding the project rows (default: `Proyectos`).
    pub table: String,
    /// Public bucket for uploaded media (default: `images`).
    pub bucket: String,
    /// Per-request timeout in seconds (default: `20`).
    pub timeout_secs: u64,
}

impl SupabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                  | Default     |
    /// |--------------------------|-------------|
    /// | `SUPABASE_URL`           | (required)  |
    /// | `SUPABASE_KEY`           | (required)  |
    /// | `SUPABASE_TABLE`         | `Proyectos` |
    /// | `SUPABASE_BUCKET`        | `images`    |
    /// | `SUPABASE_TIMEOUT_SECS`  | `20`        |
    pub fn from_env() -> Self {
        let url = std::env::var("SUPABASE_URL").expect("SUPABASE_URL must be set");
        let key = std::env::var("SUPABASE_KEY").expect("SUPABASE_KEY must be set");

        let timeout_secs: u64 = std::env::var("SUPABASE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("SUPABASE_TIMEOUT_SECS must be a valid u64");

        Self {
            url: url.trim_end_matches('/').to_string(),
            key,
            table: std::env::var("SUPABASE_TABLE").unwrap_or_else(|_| "Proyectos".into()),
            bucket: std::env::var("SUPABASE_BUCKET").unwrap_or_else(|_| "images".into()),
            timeout_secs,
        }
    }

    /// Settings for a given base URL with default table and bucket.
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.into(),
            table: "Proyectos".into(),
            bucket: "images".into(),
            timeout_secs: 20,
        }
    }
}
