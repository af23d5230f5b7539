// ── Backend facade ──
//
// Single entry point for consumers: wraps the HTTP client, owns the site
// directory, and returns domain types. Cheap to clone; background refresh
// of the site directory is tied to the facade's cancellation token.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use impact_api::ImpactClient;
use impact_api::transport::{TlsMode, TransportConfig};

use crate::config::{BackendConfig, MAX_PER_PAGE, TlsVerification};
use crate::convert;
use crate::error::CoreError;
use crate::model::{Profile, RankingPage, Site, Suggestion};
use crate::store::SiteDirectory;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<BackendInner>`.
#[derive(Clone)]
pub struct Backend {
    inner: Arc<BackendInner>,
}

struct BackendInner {
    config: BackendConfig,
    client: ImpactClient,
    directory: SiteDirectory,
    cancel: CancellationToken,
}

impl Backend {
    /// Build a backend handle. No request is made until the first call.
    pub fn new(config: BackendConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = ImpactClient::new(config.url.clone(), &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Build a backend handle around an existing client.
    pub fn with_client(config: BackendConfig, client: ImpactClient) -> Self {
        Self {
            inner: Arc::new(BackendInner {
                config,
                client,
                directory: SiteDirectory::new(),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    pub fn directory(&self) -> &SiteDirectory {
        &self.inner.directory
    }

    // ── Sites ────────────────────────────────────────────────────────

    /// Fetch the site list and replace the directory with it.
    pub async fn refresh_sites(&self) -> Result<Arc<Vec<Arc<Site>>>, CoreError> {
        let raw = self.inner.client.list_sites().await?;
        let sites: Vec<Site> = raw.into_iter().map(Site::from).collect();
        let count = sites.len();
        if self.inner.directory.replace(sites) {
            info!(count, "site directory updated");
        } else {
            debug!(count, "site directory unchanged");
        }
        Ok(self.inner.directory.snapshot())
    }

    /// Like [`refresh_sites`](Self::refresh_sites), but a failure is logged
    /// and yields an empty list.
    pub async fn sites_or_empty(&self) -> Arc<Vec<Arc<Site>>> {
        match self.refresh_sites().await {
            Ok(sites) => sites,
            Err(e) => {
                warn!(error = %e, "failed to load supported sites");
                self.inner.directory.replace(Vec::new());
                self.inner.directory.snapshot()
            }
        }
    }

    /// Resolve a site by name, loading the directory on first use.
    pub async fn site(&self, name: &str) -> Result<Arc<Site>, CoreError> {
        if !self.inner.directory.is_loaded() {
            self.refresh_sites().await?;
        }
        self.inner
            .directory
            .get(name)
            .ok_or_else(|| CoreError::SiteNotFound {
                name: name.to_owned(),
            })
    }

    // ── Rankings ─────────────────────────────────────────────────────

    /// Fetch one leaderboard page (1-based).
    pub async fn ranking(
        &self,
        site: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RankingPage, CoreError> {
        if page == 0 {
            return Err(CoreError::ValidationFailed {
                message: "page numbers start at 1".into(),
            });
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(CoreError::ValidationFailed {
                message: format!("per-page must be between 1 and {MAX_PER_PAGE}"),
            });
        }

        let raw = self
            .inner
            .client
            .ranking(site, page, per_page)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    CoreError::SiteNotFound {
                        name: site.to_owned(),
                    }
                } else {
                    CoreError::from(e)
                }
            })?;
        Ok(convert::ranking_page(site, page, per_page, raw))
    }

    // ── Profiles ─────────────────────────────────────────────────────

    /// Fetch one entity's profile.
    ///
    /// A null entity and an HTTP 404 both become `EntityNotFound`.
    pub async fn profile(&self, site: &str, identifier: &str) -> Result<Profile, CoreError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "identifier must not be empty".into(),
            });
        }

        let not_found = || CoreError::EntityNotFound {
            site: site.to_owned(),
            identifier: identifier.to_owned(),
        };

        let raw = match self.inner.client.profile(site, identifier).await {
            Ok(raw) => raw,
            Err(e) if e.is_not_found() => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };

        let entity = raw.entity.ok_or_else(not_found)?;
        Ok(Profile {
            site: site.to_owned(),
            entity: entity.into(),
            percentile: raw.stats.and_then(|s| s.percentile),
        })
    }

    /// Profile lookup gated on the site directory. The request goes out
    /// under the site's canonical name, so `Reddit` fetches `/reddit/...`.
    pub async fn site_profile(
        &self,
        site: &str,
        identifier: &str,
    ) -> Result<(Arc<Site>, Profile), CoreError> {
        let site = self.site(site).await?;
        let profile = self.profile(&site.name, identifier).await?;
        Ok((site, profile))
    }

    // ── Search ───────────────────────────────────────────────────────

    /// Suggestions for a partial identifier. A blank query returns an empty
    /// list without touching the network.
    pub async fn search(&self, site: &str, query: &str) -> Result<Vec<Suggestion>, CoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let hits = self.inner.client.search(site, query).await?;
        Ok(hits.into_iter().map(Suggestion::from).collect())
    }

    // ── Background refresh ───────────────────────────────────────────

    /// Revalidate the site directory every `site_refresh_interval` until
    /// [`shutdown`](Self::shutdown). A failed refresh keeps the previous list.
    /// Returns `None` when the interval is zero.
    pub fn spawn_site_refresh(&self) -> Option<JoinHandle<()>> {
        let interval = self.inner.config.site_refresh_interval;
        if interval.is_zero() {
            return None;
        }
        let backend = self.clone();
        let cancel = self.inner.cancel.child_token();
        Some(tokio::spawn(async move {
            site_refresh_task(backend, interval, cancel).await;
        }))
    }

    /// Stop background tasks.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }
}

async fn site_refresh_task(backend: Backend, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately; the caller already loaded once.
    ticker.tick().await;
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(e) = backend.refresh_sites().await {
                    warn!(error = %e, "site refresh failed, keeping previous list");
                }
            }
        }
    }
    debug!("site refresh task stopped");
}

fn build_transport(config: &BackendConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}
