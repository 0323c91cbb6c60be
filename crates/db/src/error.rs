/// Errors from the hosted table and storage REST APIs.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service answered 2xx with a body we could not use.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Why a [`SupabaseClient`](crate::SupabaseClient) could not be constructed.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    /// The base URL does not parse or cannot carry a path.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client rejected its settings (TLS backend, timeout).
    #[error("HTTP client could not be built: {0}")]
    Http(#[from] reqwest::Error),
}
