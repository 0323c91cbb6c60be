/// Errors from the chat completion service.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status code.
    #[error("Assistant API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// A response chunk could not be decoded.
    #[error("Invalid assistant response: {0}")]
    InvalidResponse(String),

    /// The HTTP client rejected its settings (TLS backend, timeout).
    #[error("HTTP client could not be built: {0}")]
    ClientBuild(reqwest::Error),

    /// The service produced no text at all.
    #[error("Assistant returned an empty response")]
    Empty,
}
