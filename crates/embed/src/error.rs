/// Errors from talking to the banner API.
///
/// These never reach end users: the resolver and telemetry log them and
/// carry on without a banner or without the event.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Banner API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// An environment variable held an unusable value.
    #[error("Invalid embed configuration: {0}")]
    Config(String),
}
