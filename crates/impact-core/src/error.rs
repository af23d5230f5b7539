// ── Core error types ──
//
// User-facing errors from impact-core. Consumers never see raw HTTP
// status codes or JSON parse failures; the `From<impact_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Site not found: {name}")]
    SiteNotFound { name: String },

    #[error("No {site} entry with identifier {identifier}")]
    EntityNotFound { site: String, identifier: String },

    #[error("Resource not found: {path}")]
    NotFound { path: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Backend error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `true` for the errors a view renders as its "not found" state.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SiteNotFound { .. } | Self::EntityNotFound { .. } | Self::NotFound { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<impact_api::Error> for CoreError {
    fn from(err: impact_api::Error) -> Self {
        match err {
            impact_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            impact_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            impact_api::Error::UnusableBaseUrl(url) => CoreError::Config {
                message: format!("Backend URL cannot carry API paths: {url}"),
            },
            impact_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            impact_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            impact_api::Error::NotFound { path } => CoreError::NotFound { path },
            impact_api::Error::Api { status, message } => CoreError::Api {
                message: format!("HTTP {status}: {message}"),
                status: Some(status),
            },
            impact_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected backend response: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_not_found_maps_to_not_found() {
        let err: CoreError = impact_api::Error::NotFound {
            path: "/reddit/ghost".into(),
        }
        .into();
        assert!(err.is_not_found());
        assert!(matches!(err, CoreError::NotFound { ref path } if path == "/reddit/ghost"));
    }

    #[test]
    fn api_status_is_preserved() {
        let err: CoreError = impact_api::Error::Api {
            status: 502,
            message: "bad gateway".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Api { status: Some(502), .. }));
        assert!(!err.is_not_found());
    }
}
