/// Default model for both chat and one-shot generation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default REST endpoint of the generative language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Assistant settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// `None` disables the assistant; chat endpoints then answer 503.
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL up to and including the API version, without trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds (default: `60`).
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var               | Default                                              |
    /// |-----------------------|------------------------------------------------------|
    /// | `GEMINI_API_KEY`      | unset (assistant disabled)                           |
    /// | `GEMINI_MODEL`        | `gemini-2.5-flash`                                   |
    /// | `GEMINI_BASE_URL`     | `https://generativelanguage.googleapis.com/v1beta`   |
    /// | `GEMINI_TIMEOUT_SECS` | `60`                                                 |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let timeout_secs: u64 = std::env::var("GEMINI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("GEMINI_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs,
        }
    }
}
