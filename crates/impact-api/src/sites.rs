// Site directory endpoint

use tracing::debug;

use crate::client::ImpactClient;
use crate::error::Error;
use crate::models::ApiSite;

impl ImpactClient {
    /// List every supported site.
    ///
    /// `GET /supported-sites`. A null `response` decodes as an empty list.
    pub async fn list_sites(&self) -> Result<Vec<ApiSite>, Error> {
        let url = self.url(["supported-sites"])?;
        debug!("listing sites");
        let sites: Option<Vec<ApiSite>> = self.get(url).await?;
        Ok(sites.unwrap_or_default())
    }
}
