use tracing::debug;

use crate::client::ImpactClient;
use crate::error::Error;
use crate::models::ApiTopResponse;

impl ImpactClient {
    /// Fetch one page of a site's leaderboard.
    ///
    /// `GET /{site}/ranking/{page}/{per_page}`, pages are 1-based.
    pub async fn ranking(
        &self,
        site: &str,
        page: u32,
        per_page: u32,
    ) -> Result<ApiTopResponse, Error> {
        let page_s = page.to_string();
        let per_page_s = per_page.to_string();
        let url = self.url([site, "ranking", page_s.as_str(), per_page_s.as_str()])?;
        debug!(site, page, per_page, "fetching ranking page");
        self.get(url).await
    }
}
