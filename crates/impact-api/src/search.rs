use tracing::debug;

use crate::client::ImpactClient;
use crate::error::Error;
use crate::models::{ApiSuggestion, SearchPayload};

impl ImpactClient {
    /// Search a site's indexed entities.
    ///
    /// `GET /api/search/{site}?q=...`, normalized to a suggestion list
    /// whichever shape the backend answers with.
    pub async fn search(&self, site: &str, query: &str) -> Result<Vec<ApiSuggestion>, Error> {
        let mut url = self.url(["api", "search", site])?;
        url.query_pairs_mut().append_pair("q", query);
        debug!(site, query, "searching");
        let payload: SearchPayload = self.get(url).await?;
        Ok(payload.into_suggestions())
    }
}
