// ── Ranked entity types ──

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A ranked subject (user, channel, ...) on one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub id: Option<String>,
    pub identifier: String,
    /// H-index-like score.
    pub index: u32,
    pub total_metrics: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub last_updated_at: Option<DateTime<Utc>>,
    /// Profile URL on the source site.
    pub url: Option<String>,
}

/// A single profile lookup: the entity plus its population percentile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub site: String,
    pub entity: Entity,
    /// 0-100, higher is better.
    pub percentile: Option<f64>,
}

/// Server-side pagination metadata. `total_pages` is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// One fetched page of a site's leaderboard, in server order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingPage {
    pub site: String,
    pub entities: Vec<Entity>,
    pub pagination: Pagination,
}

impl RankingPage {
    /// Overall rank of the first row on this page (1-based).
    pub fn first_rank(&self) -> u64 {
        u64::from(self.pagination.page.saturating_sub(1)) * u64::from(self.pagination.per_page)
            + 1
    }
}

/// A search hit shown while typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub identifier: String,
    pub index: u32,
    pub url: Option<String>,
}
