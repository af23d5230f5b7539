use tracing::debug;

use crate::client::ImpactClient;
use crate::error::Error;
use crate::models::ApiProfile;

impl ImpactClient {
    /// Fetch a single entity's profile.
    ///
    /// `GET /{site}/{account}`. The backend answers an unknown account with
    /// `{ "response": { "entity": null, "stats": null } }` rather than a 404,
    /// so callers must check `entity`.
    pub async fn profile(&self, site: &str, account: &str) -> Result<ApiProfile, Error> {
        let url = self.url([site, account])?;
        debug!(site, account, "fetching profile");
        let profile: Option<ApiProfile> = self.get(url).await?;
        Ok(profile.unwrap_or_default())
    }
}
