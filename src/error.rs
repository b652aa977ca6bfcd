use serde::{Deserialize, Serialize};

/// Unified error type for transport execution and request signing.
///
/// All variants are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`Network`](Self::Network) — connection reset/refused, DNS resolution failure
/// - [`Timeout`](Self::Timeout) — the request deadline elapsed
///
/// The transport automatically retries these with exponential backoff. HTTP
/// error statuses are **not** errors: the transport returns them as ordinary
/// [`Response`](crate::Response) values and callers branch on `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum TransportError {
    /// A network-level failure (DNS resolution, connection reset/refused, etc.).
    ///
    /// This is a transient error and is automatically retried.
    Network {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    ///
    /// This is a transient error and is automatically retried.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// TLS certificate validation failed.
    ///
    /// Only the [`SslVerify::Auto`](crate::SslVerify::Auto) downgrade path
    /// recovers from the local-issuer error class; every other certificate
    /// failure is fatal for the attempt.
    Ssl {
        /// Error details, including the full TLS error chain.
        detail: String,
    },

    /// A caller programming error: malformed proxy string, signing template
    /// missing a required placeholder, invalid method/URL/header name.
    ///
    /// Never retried; surfaces immediately so the mistake is caught during
    /// development.
    Contract {
        /// Description of the violated contract.
        detail: String,
    },
}

impl TransportError {
    /// Whether the retry policy may re-attempt after this error.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::Ssl { detail } => write!(f, "SSL error: {detail}"),
            Self::Contract { detail } => write!(f, "Caller contract violation: {detail}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Convenience type alias for `Result<T, TransportError>`.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Join an error with its source chain into one detail string.
///
/// reqwest wraps the interesting failure (TLS verification, connect refusal)
/// several layers deep; downgrade classification needs the full text.
pub(crate) fn error_chain(e: &dyn std::error::Error) -> String {
    let mut detail = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}
