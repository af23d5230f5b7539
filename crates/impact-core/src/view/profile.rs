// ── Profile view state ──

use crate::error::CoreError;
use crate::model::Profile;

/// What the profile view shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileView {
    Loading { site: String, identifier: String },
    Loaded(Profile),
    /// The site exists but has no entity with this identifier.
    NotFound { site: String, identifier: String },
    /// The site itself is not in the directory.
    SiteNotFound { site: String },
}

impl ProfileView {
    pub fn loading(site: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::Loading {
            site: site.into(),
            identifier: identifier.into(),
        }
    }

    /// Settle a profile lookup.
    ///
    /// Only an unknown site gets its own state. Every other failure renders as
    /// entity-not-found; the error itself is logged by the caller.
    pub fn resolve(site: &str, identifier: &str, result: Result<Profile, CoreError>) -> Self {
        match result {
            Ok(profile) => Self::Loaded(profile),
            Err(CoreError::SiteNotFound { name }) => Self::SiteNotFound { site: name },
            Err(_) => Self::NotFound {
                site: site.to_owned(),
                identifier: identifier.to_owned(),
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn site(&self) -> &str {
        match self {
            Self::Loading { site, .. }
            | Self::NotFound { site, .. }
            | Self::SiteNotFound { site } => site,
            Self::Loaded(profile) => &profile.site,
        }
    }

    /// Whether this view is for `(site, identifier)`.
    pub fn is_for(&self, site: &str, identifier: &str) -> bool {
        match self {
            Self::Loading {
                site: s,
                identifier: i,
            }
            | Self::NotFound {
                site: s,
                identifier: i,
            } => s == site && i == identifier,
            Self::Loaded(profile) => {
                profile.site == site && profile.entity.identifier == identifier
            }
            Self::SiteNotFound { site: s } => s == site,
        }
    }
}

/// `couldn't find a user with the identifier "x" on reddit`
pub fn not_found_message(entity_name: &str, identifier: &str, site: &str) -> String {
    format!(
        "couldn't find a {} with the identifier \"{identifier}\" on {site}",
        entity_name.to_lowercase()
    )
}
