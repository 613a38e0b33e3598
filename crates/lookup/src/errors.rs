use thiserror::Error;

/// Failures from the lookup API client. Every variant degrades to the same
/// terminal `no_data` presentation; nothing here is fatal to the listener.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The lookup API answered outside the 2xx range.
    #[error("lookup API returned status {0}")]
    Status(u16),

    /// The response body did not match the expected JSON shape.
    #[error("unexpected response shape: {0}")]
    MalformedResponse(String),
}

/// A URL that cannot name a lookup target: wrong scheme, malformed, or
/// hostless (internal pages, blank tabs).
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("malformed url: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("url has no host")]
    MissingHost,
}
