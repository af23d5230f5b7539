// Backend HTTP client
//
// Wraps `reqwest::Client` with URL construction and response decoding.
// Endpoint methods live in sibling modules (sites, ranking, profile, search)
// as inherent `impl ImpactClient` blocks.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::strip_envelope;
use crate::transport::TransportConfig;

const BODY_PREVIEW: usize = 200;

/// Raw HTTP client for the leaderboard backend.
///
/// All endpoints are unauthenticated GETs. Payloads are returned with the
/// optional `{ "response": ... }` wrapper already stripped.
pub struct ImpactClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Option<Duration>,
}

impl ImpactClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root; it may carry a path prefix
    /// (e.g. `https://host/backend/`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: Some(transport.timeout),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: None,
        }
    }

    /// Record the timeout the injected `reqwest::Client` was built with, so
    /// timeout errors report it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append percent-encoded path segments to the base URL.
    ///
    /// Identifiers are user-supplied (search terms, account names), so each
    /// one is pushed as a single segment rather than spliced into a string.
    pub(crate) fn url<I, S>(&self, segments: I) -> Result<Url, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::UnusableBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment.as_ref());
            }
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the (optionally wrapped) payload.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let path = url.path().to_owned();
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        Self::parse_body(resp, &path).await
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            // 0 when the injected client's timeout is unknown.
            Error::Timeout {
                timeout_secs: self.timeout.map_or(0, |t| t.as_secs()),
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Check the HTTP status, strip the envelope, then deserialize.
    async fn parse_body<T: DeserializeOwned>(
        resp: reqwest::Response,
        path: &str,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                path: path.to_owned(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(bytes = body.len(), "response body received");

        let decode_error = |e: serde_json::Error| {
            let head = preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {head:?})"),
                body: body.clone(),
            }
        };

        let value: serde_json::Value = serde_json::from_str(&body).map_err(decode_error)?;
        serde_json::from_value(strip_envelope(value)).map_err(decode_error)
    }
}

/// First [`BODY_PREVIEW`] bytes of `body`, cut on a char boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(BODY_PREVIEW);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
