// ── Runtime backend configuration ──
//
// Describes *how* to talk to the leaderboard backend and how the views
// behave. Never touches disk: the CLI/TUI builds a `BackendConfig` (usually
// via `impact-config`) and hands it in.

use std::time::Duration;

use url::Url;

use crate::view::Theme;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs on self-hosted backends).
    DangerAcceptInvalid,
}

/// Configuration for a single backend.
///
/// Built by CLI/TUI, passed to `Backend` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend root URL (e.g., `https://api.example.com`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Ranking rows per page.
    pub per_page: u32,
    /// Pause in typing before a suggestion search fires.
    pub search_debounce: Duration,
    /// How long a row must stay selected before its preview opens.
    pub preview_delay: Duration,
    /// How often the site directory is revalidated. Zero disables it.
    pub site_refresh_interval: Duration,
    /// Theme passed to profile previews.
    pub theme: Theme,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL
                .parse()
                .expect("default backend URL is valid"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            per_page: DEFAULT_PER_PAGE,
            search_debounce: Duration::from_millis(300),
            preview_delay: Duration::from_millis(500),
            site_refresh_interval: Duration::from_secs(60),
            theme: Theme::default(),
        }
    }
}
